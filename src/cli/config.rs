//! Configuration and calibration loading shared by the subcommands.
//!
//! Settings come from an optional file, either TOML:
//!
//! ```toml
//! # thermo.toml
//! [measurement]
//! period = 2.0
//! average = 3
//!
//! [[calibrations]]
//! name = "sample_a"
//! kind = "points"
//! ```
//!
//! or the `key    value` lines of older setups. Calibration tables named in
//! the file are looked up next to it.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

use specthermo::calibration::{Calibration, CalibrationKind};
use specthermo::config::{Config, ConfigReport};

/// Load the configuration file, or the defaults when none is given.
pub fn load(path: Option<&Path>) -> Result<(Config, ConfigReport)> {
    match path {
        Some(path) => {
            let (config, report) = Config::from_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            if !report.is_clean() {
                warn!(
                    "{}: {} warnings, {} skipped lines",
                    path.display(),
                    report.warning_count(),
                    report.skipped_count()
                );
            }
            Ok((config, report))
        }
        None => Ok((Config::default(), ConfigReport::new("defaults"))),
    }
}

/// Calibration kind from the `--polynomial` flag
pub fn calibration_kind(polynomial: bool) -> CalibrationKind {
    if polynomial {
        CalibrationKind::Polynomial
    } else {
        CalibrationKind::Points
    }
}

/// The explicitly given calibration table, or the first usable one named in
/// the configuration.
pub fn select_calibration(
    explicit: Option<&Path>,
    polynomial: bool,
    config: &Config,
    config_path: Option<&Path>,
    report: &mut ConfigReport,
) -> Result<Arc<Calibration>> {
    if let Some(path) = explicit {
        let calibration = Calibration::from_file(path, calibration_kind(polynomial))
            .with_context(|| format!("Failed to load calibration: {}", path.display()))?;
        return Ok(Arc::new(calibration));
    }

    let dir = config_path
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let mut loaded = config.load_calibrations(dir, report);
    if loaded.is_empty() {
        anyhow::bail!("No calibration found: pass --calibration or name one in the config");
    }
    let first = loaded.swap_remove(0);
    info!("Using calibration '{}'", first.name);
    Ok(first.calibration)
}
