use std::str::FromStr;

use log::warn;

use crate::calibration::CalibrationKind;
use crate::device::DacKind;
use crate::edge::EdgeMethod;

use super::{CalibrationSource, Config, ConfigReport};

/// Separator between key and value
pub const LEGACY_DELIMITER: &str = "    ";

/// Keys understood by the line format
pub const LEGACY_KEYS: &[&str] = &[
    "calib_points",
    "calib_polynom",
    "const_skip",
    "const_eps",
    "const_smooth1",
    "const_smooth2",
    "const_1DHalfW",
    "const_slider",
    "absorbtion_edge",
    "DAC",
    "DAC_maxStep",
    "PID_P",
    "PID_I",
    "PID_D",
    "PID_period",
];

/// Outcome of applying one line
enum Applied {
    Ok,
    Substituted(String),
}

/// Parse `key    value` lines on top of the default configuration.
///
/// Unknown keys, missing values and unparsable numbers are reported and the
/// line is skipped; the rest of the file still applies. Empty lines and lines
/// starting with `#` are ignored.
pub(crate) fn parse_legacy(content: &str, source: impl Into<String>) -> (Config, ConfigReport) {
    let mut config = Config::default();
    let mut report = ConfigReport::new(source);

    for (index, raw) in content.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut items = line.split(LEGACY_DELIMITER).map(str::trim);
        let key = items.next().unwrap_or_default();
        if !LEGACY_KEYS.contains(&key) {
            warn!("Config line {}: unknown key '{}'", number, key);
            report.skip(Some(number), key, format!("unknown key '{}'", key));
            continue;
        }
        let Some(value) = items.find(|item| !item.is_empty()) else {
            report.skip(Some(number), key, "missing value");
            continue;
        };

        match apply(&mut config, key, value) {
            Ok(Applied::Ok) => report.accept(Some(number), key),
            Ok(Applied::Substituted(message)) => {
                warn!("Config line {}: {}", number, message);
                report.warn(Some(number), key, message);
            }
            Err(message) => {
                warn!("Config line {}: {}", number, message);
                report.skip(Some(number), key, message);
            }
        }
    }

    (config, report)
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<Applied, String> {
    let edge = &mut config.edge;
    let pid = &mut config.pid;
    match key {
        "calib_points" => config.calibrations.push(calibration(value, CalibrationKind::Points)),
        "calib_polynom" => config
            .calibrations
            .push(calibration(value, CalibrationKind::Polynomial)),
        "const_skip" => edge.points_to_skip = parse(value)?,
        "const_eps" => edge.epsilon_limit = parse_float(value)?,
        "const_smooth1" => edge.smoothing_intensities = parse(value)?,
        "const_smooth2" => edge.smoothing_derivatives = parse(value)?,
        "const_1DHalfW" => edge.search_half_width = parse(value)?,
        "const_slider" => edge.slider_limit = parse_float(value)?,
        "absorbtion_edge" => match EdgeMethod::from_str(value) {
            Ok(method) => edge.method = method,
            Err(_) => {
                edge.method = EdgeMethod::Constant;
                return Ok(Applied::Substituted(format!(
                    "unknown edge method '{}', using '{}'",
                    value,
                    EdgeMethod::Constant
                )));
            }
        },
        "DAC" => {
            config.device.dac = DacKind::from_config_value(value);
            if !matches!(value, "lab" | "offline") {
                return Ok(Applied::Substituted(format!(
                    "unknown DAC '{}', using offline",
                    value
                )));
            }
        }
        "DAC_maxStep" => pid.max_voltage_step = parse_float(value)?,
        "PID_P" => pid.p = parse_float(value)?,
        "PID_I" => pid.i = parse_float(value)?,
        "PID_D" => pid.d = parse_float(value)?,
        "PID_period" => pid.period = parse_float(value)?,
        _ => return Err(format!("unknown key '{}'", key)),
    }
    Ok(Applied::Ok)
}

fn calibration(name: &str, kind: CalibrationKind) -> CalibrationSource {
    CalibrationSource {
        name: name.to_string(),
        kind,
    }
}

fn parse<T: FromStr>(value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("cannot parse '{}'", value))
}

fn parse_float(value: &str) -> Result<f64, String> {
    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("cannot parse '{}'", value))
}
