use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::calibration::{Calibration, CalibrationKind};
use crate::device::{DacKind, SpectrometerKind};
use crate::edge::EdgeParameters;
use crate::pid::{PidParameters, DEFAULT_MAX_VOLTAGE_STEP};

use super::legacy::parse_legacy;
use super::{ConfigError, ConfigReport};

/// Extension of calibration tables named in the configuration
pub const CALIBRATION_EXTENSION: &str = "clb";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Edge search constants
    pub edge: EdgeParameters,
    /// Exposure loop timing
    pub measurement: MeasurementSettings,
    /// Heater controller settings
    pub pid: PidSettings,
    /// Instrument drivers
    pub device: DeviceSettings,
    /// Calibration tables, in selection order
    pub calibrations: Vec<CalibrationSource>,
}

/// Exposure loop timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementSettings {
    /// Seconds between exposures
    pub period: f64,
    /// Exposures averaged per analysis
    pub average: usize,
}

impl Default for MeasurementSettings {
    fn default() -> Self {
        Self {
            period: 2.0,
            average: 1,
        }
    }
}

/// Heater controller settings (raw constants as entered by the operator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidSettings {
    /// Proportional band (`PID_P`)
    pub p: f64,
    /// Integral time (`PID_I`)
    pub i: f64,
    /// Derivative time (`PID_D`)
    pub d: f64,
    /// Target temperature in °C
    pub set_point: f64,
    /// Set point ramp in °C per minute
    pub ramp: f64,
    /// Largest voltage change per tick (`DAC_maxStep`)
    pub max_voltage_step: f64,
    /// Samples averaged by the controller
    pub buffer_length: usize,
    /// Seconds between ticks (`PID_period`)
    pub period: f64,
}

impl Default for PidSettings {
    fn default() -> Self {
        Self {
            p: 10.0,
            i: 0.0,
            d: 0.0,
            set_point: 20.0,
            ramp: 0.0,
            max_voltage_step: DEFAULT_MAX_VOLTAGE_STEP,
            buffer_length: 3,
            period: 4.5,
        }
    }
}

impl PidSettings {
    /// Validated controller parameters
    pub fn parameters(&self) -> Result<PidParameters, ConfigError> {
        Ok(PidParameters::from_raw(
            self.p,
            self.i,
            self.d,
            self.set_point,
            self.ramp,
            self.max_voltage_step,
            self.buffer_length,
        )?)
    }
}

/// Instrument driver selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Spectrometer driver
    pub spectrometer: SpectrometerKind,
    /// Heater DAC driver
    pub dac: DacKind,
}

/// Calibration table named in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationSource {
    /// Table name; the file is `<name>.clb`
    pub name: String,
    /// How the table is interpreted
    pub kind: CalibrationKind,
}

impl CalibrationSource {
    /// Location of the table relative to `dir`
    pub fn path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}", self.name, CALIBRATION_EXTENSION))
    }
}

/// Calibration table loaded from a [`CalibrationSource`]
#[derive(Debug, Clone)]
pub struct NamedCalibration {
    /// Table name
    pub name: String,
    /// Loaded calibration
    pub calibration: Arc<Calibration>,
}

impl Config {
    /// Load a configuration file.
    ///
    /// Files ending in `.toml` are parsed as TOML; anything else is read as
    /// `key    value` lines. Line problems of the legacy format land in the
    /// returned report and never fail the load.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<(Self, ConfigReport), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loading configuration from {}", path.display());

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if is_toml {
            let config = Self::from_toml_str(&content)?;
            Ok((config, ConfigReport::new(path.display().to_string())))
        } else {
            Ok(parse_legacy(&content, path.display().to_string()))
        }
    }

    /// Parse a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a legacy `key    value` configuration
    pub fn from_legacy_str(content: &str) -> (Self, ConfigReport) {
        parse_legacy(content, "<string>")
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            section: "config",
            reason: e.to_string(),
        })
    }

    /// Check the configuration as a whole
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.edge.validate().map_err(|reason| ConfigError::Invalid {
            section: "edge",
            reason,
        })?;

        let measurement = &self.measurement;
        if !(measurement.period > 0.0) || !measurement.period.is_finite() {
            return Err(invalid("measurement", "period must be positive"));
        }
        if measurement.average == 0 {
            return Err(invalid("measurement", "average must be positive"));
        }
        let exposure = match &self.device.spectrometer {
            SpectrometerKind::Offline(settings) => settings.exposure_seconds,
            SpectrometerKind::Replay(settings) => settings.exposure_seconds,
        };
        if measurement.period < exposure {
            return Err(invalid(
                "measurement",
                format!(
                    "period {} s is shorter than the exposure time {} s",
                    measurement.period, exposure
                ),
            ));
        }

        self.pid.parameters()?;
        if !(self.pid.period > 0.0) || !self.pid.period.is_finite() {
            return Err(invalid("pid", "period must be positive"));
        }
        Ok(())
    }

    /// Load every configured calibration table found in `dir`.
    ///
    /// Tables that fail to load are reported and left out.
    pub fn load_calibrations(&self, dir: &Path, report: &mut ConfigReport) -> Vec<NamedCalibration> {
        let mut loaded = Vec::with_capacity(self.calibrations.len());
        for source in &self.calibrations {
            let path = source.path(dir);
            match Calibration::from_file(&path, source.kind) {
                Ok(calibration) => {
                    report.accept(None, format!("calibration {}", source.name));
                    loaded.push(NamedCalibration {
                        name: source.name.clone(),
                        calibration: Arc::new(calibration),
                    });
                }
                Err(e) => {
                    warn!("Calibration '{}' not loaded: {}", source.name, e);
                    report.skip(
                        None,
                        format!("calibration {}", source.name),
                        format!("{}: {}", path.display(), e),
                    );
                }
            }
        }
        if loaded.is_empty() {
            report.warn(None, "calibrations", "No calibration found");
        }
        loaded
    }
}

fn invalid(section: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        section,
        reason: reason.into(),
    }
}
