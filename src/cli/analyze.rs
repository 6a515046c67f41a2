use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use specthermo::analysis::{Analysis, AnalysisError, SpectraProcessor};
use specthermo::data_file::read_columns;
use specthermo::history::TemperatureHistory;

use super::config;

/// Analyse saved spectra in order and print one temperature per average
pub fn run(
    spectra: Vec<PathBuf>,
    calibration: Option<PathBuf>,
    polynomial: bool,
    config_path: Option<PathBuf>,
    average: Option<usize>,
    history: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let (settings, mut report) = config::load(config_path.as_deref())?;
    settings.edge.validate().map_err(anyhow::Error::msg)?;
    let calibration = config::select_calibration(
        calibration.as_deref(),
        polynomial,
        &settings,
        config_path.as_deref(),
        &mut report,
    )?;
    let average = average.unwrap_or(settings.measurement.average);

    info!("specthermo - Offline Analysis");
    info!("=============================");
    info!("Spectra: {}", spectra.len());
    info!("Average: {}", average);
    info!("Edge method: {}", settings.edge.method);

    let time_zero = match spectra.first() {
        Some(path) => acquisition_time(path),
        None => Utc::now(),
    };
    let mut processor = SpectraProcessor::new(settings.edge.clone(), average)
        .context("Invalid averaging")?
        .with_history(TemperatureHistory::starting_at(time_zero));
    processor.set_calibration(Some(calibration));

    let mut results: Vec<(PathBuf, Analysis)> = Vec::new();
    for path in &spectra {
        let columns = read_columns(path)
            .with_context(|| format!("Failed to read spectrum: {}", path.display()))?;
        let timestamp = acquisition_time(path);

        match processor.load(&columns.first, &columns.second, timestamp, false) {
            Ok(Some(analysis)) => results.push((path.clone(), analysis)),
            Ok(None) => {}
            Err(AnalysisError::EdgeNotFound(e)) => {
                warn!("{}: {}", path.display(), e);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Analysis failed: {}", path.display()))
            }
        }
    }

    if json {
        let analyses: Vec<&Analysis> = results.iter().map(|(_, a)| a).collect();
        println!("{}", serde_json::to_string_pretty(&analyses)?);
    } else {
        println!("{:<40} {:>10} {:>12} {:>12}", "file", "time (s)", "edge (nm)", "T (°C)");
        for (path, analysis) in &results {
            println!(
                "{:<40} {:>10.1} {:>12.3} {:>12.2}",
                path.display(),
                analysis.elapsed,
                analysis.edge_wavelength,
                analysis.temperature
            );
        }
    }

    if results.is_empty() {
        warn!("No temperature derived from {} spectra", spectra.len());
    }

    if let Some(out) = history {
        processor
            .history()
            .export(&out)
            .with_context(|| format!("Failed to export history: {}", out.display()))?;
        info!("History written to {}", out.display());
    }

    Ok(())
}

/// Modification time of a saved spectrum, or now when unavailable
fn acquisition_time(path: &Path) -> DateTime<Utc> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}
