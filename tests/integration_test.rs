//! Integration tests for specthermo
//!
//! These tests drive the measurement chain end to end through files,
//! configuration and the background loops.

use crossbeam_channel::unbounded;
use specthermo::analysis::{AnalysisEvent, SpectraProcessor};
use specthermo::calibration::{Calibration, CalibrationKind};
use specthermo::config::Config;
use specthermo::data_file::{read_columns, write_columns};
use specthermo::device::{self, Dac, OfflineDac, ReplaySettings, ReplaySpectrometer, Spectrometer};
use specthermo::edge::EdgeParameters;
use specthermo::history::TemperatureHistory;
use specthermo::pid::{PidController, PidParameters};
use specthermo::runtime::{pid_step, Runtime, HEATER_CHANNEL};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

/// Flat baseline of 100 counts with an edge rising 50 counts/nm at `edge`
fn edge_spectrum(edge: f64) -> (Vec<f64>, Vec<f64>) {
    let wavelengths: Vec<f64> = (0..100).map(f64::from).collect();
    let intensities = wavelengths
        .iter()
        .map(|&w| if w < edge { 100.0 } else { 100.0 + 50.0 * (w - edge) })
        .collect();
    (wavelengths, intensities)
}

/// Write a spectrum the way SpectraSuite exports it
fn write_spectrasuite(path: &Path, wavelengths: &[f64], intensities: &[f64]) {
    let mut content = String::from("SpectraSuite Data File\n");
    for i in 1..17 {
        content.push_str(&format!("Header line {}\n", i));
    }
    for (w, i) in wavelengths.iter().zip(intensities) {
        content.push_str(&format!("{}\t{}\n", w.to_string().replace('.', ","), i));
    }
    content.push_str(">>>>>End Processed Spectral Data<<<<<\n");
    fs::write(path, content).unwrap();
}

fn write_edges(dir: &Path, edges: &[f64]) -> Vec<PathBuf> {
    edges
        .iter()
        .enumerate()
        .map(|(k, &edge)| {
            let path = dir.join(format!("spectrum_{:03}.txt", k));
            let (w, i) = edge_spectrum(edge);
            write_columns(&path, &w, &i).unwrap();
            path
        })
        .collect()
}

/// SpectraSuite files through averaging, calibration and history export
#[test]
fn test_files_to_exported_history() {
    let dir = tempdir().unwrap();
    let calibration_path = dir.path().join("sample.clb");
    write_columns(&calibration_path, &[40.0, 50.0, 60.0], &[100.0, 200.0, 300.0]).unwrap();
    let calibration = Calibration::from_file(&calibration_path, CalibrationKind::Points).unwrap();

    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let mut processor = SpectraProcessor::new(EdgeParameters::default(), 2)
        .unwrap()
        .with_history(TemperatureHistory::starting_at(t0));
    processor.set_calibration(Some(Arc::new(calibration)));

    let mut temperatures = Vec::new();
    for k in 0..4 {
        let path = dir.path().join(format!("ss_{}.txt", k));
        let (w, i) = edge_spectrum(50.0);
        write_spectrasuite(&path, &w, &i);

        let columns = read_columns(&path).unwrap();
        assert_eq!(columns.len(), 100);
        let timestamp = t0 + ChronoDuration::seconds(10 * k);
        if let Some(analysis) = processor
            .load(&columns.first, &columns.second, timestamp, false)
            .unwrap()
        {
            assert_eq!(analysis.spectra_count, 2);
            temperatures.push((analysis.elapsed, analysis.temperature));
        }
    }

    assert_eq!(temperatures.len(), 2);
    // Mean timestamps of (0, 10) and (20, 30)
    assert!((temperatures[0].0 - 5.0).abs() < 1e-6);
    assert!((temperatures[1].0 - 25.0).abs() < 1e-6);
    for (_, t) in &temperatures {
        assert!((t - 200.0).abs() < 10.0);
    }

    let out = dir.path().join("history.txt");
    processor.history().export(&out).unwrap();
    let exported = read_columns(&out).unwrap();
    assert_eq!(exported.first.len(), 2);
    assert_eq!(exported.second[0], temperatures[0].1);
}

/// Legacy configuration naming a calibration table next to it
#[test]
fn test_legacy_config_drives_analysis() {
    let dir = tempdir().unwrap();
    write_columns(dir.path().join("poly.clb"), &[0.0, 1.0], &[-30.0, 1.0]).unwrap();
    let config_path = dir.path().join("Config.cfg");
    fs::write(
        &config_path,
        "calib_polynom    poly\nconst_smooth1    4\nabsorbtion_edge    Inchworm\nmystery    1\n",
    )
    .unwrap();

    let (config, mut report) = Config::from_file(&config_path).unwrap();
    assert_eq!(report.skipped_count(), 1);
    let calibrations = config.load_calibrations(dir.path(), &mut report);
    assert_eq!(calibrations.len(), 1);

    let mut processor = SpectraProcessor::new(config.edge.clone(), 1).unwrap();
    processor.set_calibration(Some(Arc::clone(&calibrations[0].calibration)));
    let (w, i) = edge_spectrum(50.0);
    let analysis = processor.load(&w, &i, Utc::now(), false).unwrap().unwrap();
    assert!((analysis.temperature - 20.0).abs() < 0.5);
}

/// Replayed spectra through the background measurement loop
#[test]
fn test_replay_through_runtime() {
    let dir = tempdir().unwrap();
    let files = write_edges(dir.path(), &[45.0, 50.0, 55.0]);

    let mut spectrometer = ReplaySpectrometer::new(ReplaySettings {
        files,
        repeat: false,
        exposure_seconds: 0.0,
    })
    .unwrap();
    device::connect(&mut spectrometer).unwrap();

    let (sender, receiver) = unbounded();
    let mut processor = SpectraProcessor::new(EdgeParameters::default(), 1)
        .unwrap()
        .with_events(sender);
    processor.set_calibration(Some(Arc::new(Calibration::polynomial(vec![0.0, 1.0]).unwrap())));

    let pid = PidController::new(3, 1.0).unwrap();
    let mut runtime = Runtime::new(processor, pid, Box::new(OfflineDac::new()));
    runtime
        .start_measurement(Box::new(spectrometer), Duration::from_millis(5))
        .unwrap();

    let mut edges = Vec::new();
    while edges.len() < 3 {
        match receiver.recv_timeout(Duration::from_secs(10)).unwrap() {
            AnalysisEvent::Analyzed(analysis) => edges.push(analysis.temperature),
            AnalysisEvent::EdgeNotFound { reason, .. } => panic!("edge not found: {}", reason),
        }
    }
    let spectrometer = runtime.stop().unwrap().unwrap();
    assert!(spectrometer.is_removed());

    for (found, expected) in edges.iter().zip([45.0, 50.0, 55.0]) {
        assert!((found - expected).abs() < 0.5, "{} vs {}", found, expected);
    }
}

/// The heater voltage climbs by at most one step per tick towards the set point
#[test]
fn test_closed_loop_ramps_heater() {
    let processor = Mutex::new(SpectraProcessor::new(EdgeParameters::default(), 1).unwrap());
    let mut pid = PidController::new(2, 1.0).unwrap();
    pid.apply(PidParameters::from_raw(10.0, 0.0, 0.0, 100.0, 0.0, 0.1, 2).unwrap());
    pid.reset(100.0);
    let pid = Mutex::new(pid);
    let mut dac = OfflineDac::new();

    let mut voltages = Vec::new();
    for k in 0..6 {
        processor
            .lock()
            .unwrap()
            .history_mut()
            .push_elapsed(k as f64, 20.0);
        let output = pid_step(&processor, &pid, &mut dac).unwrap().unwrap();
        voltages.push(output.voltage);
    }

    // Warm-up tick, then +0.1 V per tick
    assert_eq!(voltages[0], 0.0);
    for pair in voltages[1..].windows(2) {
        assert!((pair[1] - pair[0] - 0.1).abs() < 1e-9);
    }
    assert_eq!(dac.voltage(HEATER_CHANNEL), Some(*voltages.last().unwrap()));
    assert!((dac.voltage(1).unwrap() - 0.2).abs() < 1e-12);
}
