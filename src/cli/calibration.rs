use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use specthermo::calibration::Calibration;
use specthermo::data_file::{write_columns, COLUMN_DELIMITER};

use super::config::calibration_kind;

/// Sample a calibration curve
pub fn run(
    file: PathBuf,
    polynomial: bool,
    from: f64,
    to: f64,
    step: f64,
    output: Option<PathBuf>,
) -> Result<()> {
    if !(step > 0.0) || !step.is_finite() {
        anyhow::bail!("Step must be positive, got {}", step);
    }
    if !(from <= to) {
        anyhow::bail!("Empty range: {} .. {}", from, to);
    }

    let calibration = Calibration::from_file(&file, calibration_kind(polynomial))
        .with_context(|| format!("Failed to load calibration: {}", file.display()))?;
    let (wavelengths, temperatures) = calibration
        .sample(from, to, step)
        .context("Failed to sample calibration")?;
    info!(
        "{:?} calibration sampled at {} wavelengths",
        calibration.kind(),
        wavelengths.len()
    );

    match output {
        Some(out) => {
            write_columns(&out, &wavelengths, &temperatures)
                .with_context(|| format!("Failed to write curve: {}", out.display()))?;
            info!("Curve written to {}", out.display());
        }
        None => {
            for (w, t) in wavelengths.iter().zip(&temperatures) {
                println!("{}{}{}", w, COLUMN_DELIMITER, t);
            }
        }
    }
    Ok(())
}
