use super::*;
use crate::analysis::{AnalysisEvent, SpectraProcessor};
use crate::calibration::Calibration;
use crate::device::{Dac, DeviceError, OfflineDac, Reading, Spectrometer};
use crate::edge::EdgeParameters;
use crate::pid::{PidController, PidParameters, PidState};
use chrono::Utc;
use crossbeam_channel::unbounded;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Instant-exposure device returning a sharp edge at 50 nm
#[derive(Default)]
struct EdgeSpectrometer {
    open: bool,
    exposing: bool,
    removed: bool,
}

impl EdgeSpectrometer {
    fn opened() -> Self {
        Self {
            open: true,
            ..Default::default()
        }
    }
}

impl Spectrometer for EdgeSpectrometer {
    fn model_name(&self) -> &str {
        "edge"
    }
    fn serial_number(&self) -> &str {
        "1"
    }
    fn search(&mut self) -> Result<usize, DeviceError> {
        Ok(1)
    }
    fn select(&mut self, _index: usize) -> Result<(), DeviceError> {
        Ok(())
    }
    fn open(&mut self) -> Result<(), DeviceError> {
        self.open = true;
        Ok(())
    }
    fn close(&mut self) {
        self.open = false;
    }
    fn start_exposure(&mut self) -> Result<(), DeviceError> {
        if !self.open {
            return Err(DeviceError::NotOpen);
        }
        self.exposing = true;
        Ok(())
    }
    fn cancel_exposure(&mut self) {
        self.exposing = false;
    }
    fn is_removed(&self) -> bool {
        self.removed
    }
    fn exposure_seconds(&self) -> f64 {
        0.0
    }
    fn current_reading(&mut self) -> Result<Option<Reading>, DeviceError> {
        if !std::mem::take(&mut self.exposing) {
            return Ok(None);
        }
        let wavelengths: Vec<f64> = (0..100).map(f64::from).collect();
        let intensities = wavelengths
            .iter()
            .map(|&w| if w < 50.0 { 100.0 } else { 100.0 + 50.0 * (w - 50.0) })
            .collect();
        Ok(Some(Reading {
            wavelengths,
            intensities,
            timestamp: Utc::now(),
        }))
    }
}

fn processor() -> SpectraProcessor {
    let mut processor = SpectraProcessor::new(EdgeParameters::default(), 1).unwrap();
    let calibration = Calibration::polynomial(vec![-30.0, 1.0]).unwrap();
    processor.set_calibration(Some(Arc::new(calibration)));
    processor
}

fn active_pid() -> PidController {
    let mut pid = PidController::new(2, 1.0).unwrap();
    pid.apply(PidParameters::from_raw(10.0, 0.0, 0.0, 30.0, 0.0, 0.5, 2).unwrap());
    pid
}

#[test]
fn test_measurement_step_starts_then_collects() {
    let mut spectrometer = EdgeSpectrometer::opened();
    let processor = Mutex::new(processor());

    assert!(measurement_step(&mut spectrometer, &processor, false)
        .unwrap()
        .is_none());
    assert!(spectrometer.exposing);

    let analysis = measurement_step(&mut spectrometer, &processor, false)
        .unwrap()
        .unwrap();
    assert!((analysis.edge_wavelength - 50.0).abs() < 0.5);
    assert!((analysis.temperature - 20.0).abs() < 0.5);
    assert_eq!(processor.lock().unwrap().history().len(), 1);
    assert!(spectrometer.exposing);
}

#[test]
fn test_measurement_step_removed_device() {
    let mut spectrometer = EdgeSpectrometer {
        removed: true,
        ..EdgeSpectrometer::opened()
    };
    let processor = Mutex::new(processor());
    assert!(matches!(
        measurement_step(&mut spectrometer, &processor, false),
        Err(RuntimeError::SpectrometerRemoved)
    ));
}

#[test]
fn test_pid_step_writes_both_channels() {
    let processor = Mutex::new(processor());
    processor.lock().unwrap().history_mut().push_elapsed(0.0, 25.0);
    let pid = Mutex::new(active_pid());
    let mut dac = OfflineDac::new();

    // Idle controller does nothing
    assert!(pid_step(&processor, &pid, &mut dac).unwrap().is_none());
    assert_eq!(dac.voltage(HEATER_CHANNEL), Some(0.0));

    pid.lock().unwrap().reset(30.0);
    let warm_up = pid_step(&processor, &pid, &mut dac).unwrap().unwrap();
    assert_eq!(warm_up.voltage, 0.0);
    assert!((dac.voltage(TEMPERATURE_CHANNEL).unwrap() - 0.25).abs() < 1e-12);

    processor.lock().unwrap().history_mut().push_elapsed(1.0, 25.0);
    let output = pid_step(&processor, &pid, &mut dac).unwrap().unwrap();
    // Error 5 °C at P = 0.1 wants 2.65 V; rate limited to 0.5 V
    assert!((output.voltage - 0.5).abs() < 1e-12);
    assert_eq!(dac.voltage(HEATER_CHANNEL), Some(output.voltage));
    assert_eq!(dac.last_written_value(), output.voltage);
}

#[test]
fn test_pid_step_without_temperature() {
    let processor = Mutex::new(processor());
    let pid = Mutex::new(active_pid());
    pid.lock().unwrap().reset(20.0);
    let mut dac = OfflineDac::new();
    assert!(pid_step(&processor, &pid, &mut dac).unwrap().is_none());
}

#[test]
fn test_start_pid_without_temperature_sets_voltage_only() {
    let mut runtime = Runtime::new(processor(), active_pid(), Box::new(OfflineDac::new()));

    let start = runtime.start_pid(1.2, Duration::from_millis(10)).unwrap();
    assert_eq!(start, PidStart::VoltageOnly);
    assert!(!runtime.is_regulating());

    let dac = runtime.dac();
    let dac = dac.lock().unwrap();
    assert_eq!(dac.voltage(TEMPERATURE_CHANNEL), Some(0.0));
    assert_eq!(dac.voltage(HEATER_CHANNEL), Some(1.2));
    assert_eq!(dac.last_written_value(), 1.2);
}

#[test]
fn test_start_pid_rejects_invalid_voltage() {
    let mut runtime = Runtime::new(processor(), active_pid(), Box::new(OfflineDac::new()));
    assert!(matches!(
        runtime.start_pid(-1.0, Duration::from_millis(10)),
        Err(RuntimeError::InvalidVoltage(_))
    ));
}

#[test]
fn test_pid_loop_publishes_and_stops() {
    let (sender, receiver) = unbounded();
    let mut runtime = Runtime::new(processor(), active_pid(), Box::new(OfflineDac::new()))
        .with_pid_events(sender);
    runtime
        .processor()
        .lock()
        .unwrap()
        .history_mut()
        .push_elapsed(0.0, 25.0);

    let start = runtime.start_pid(0.0, Duration::from_millis(5)).unwrap();
    assert!(matches!(start, PidStart::Regulating(_)));
    assert!(runtime.is_regulating());
    assert!(matches!(
        runtime.start_pid(0.0, Duration::from_millis(5)),
        Err(RuntimeError::AlreadyRunning("PID"))
    ));

    // Immediate tick plus at least one loop tick
    receiver.recv_timeout(Duration::from_secs(5)).unwrap();
    receiver.recv_timeout(Duration::from_secs(5)).unwrap();

    runtime.stop_pid().unwrap();
    assert!(!runtime.is_regulating());
    assert_eq!(runtime.pid().lock().unwrap().state(), PidState::Idle);
}

#[test]
fn test_measurement_loop_analyses_and_returns_device() {
    let (sender, receiver) = unbounded();
    let mut runtime = Runtime::new(
        processor().with_events(sender),
        active_pid(),
        Box::new(OfflineDac::new()),
    );

    runtime
        .start_measurement(Box::new(EdgeSpectrometer::opened()), Duration::from_millis(5))
        .unwrap();
    assert!(runtime.is_measuring());

    match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
        AnalysisEvent::Analyzed(analysis) => {
            assert!((analysis.temperature - 20.0).abs() < 0.5)
        }
        other => panic!("unexpected event {:?}", other),
    }

    let spectrometer = runtime.stop().unwrap();
    assert!(spectrometer.is_some());
    assert!(!runtime.is_measuring());
    assert!(!runtime.processor().lock().unwrap().history().is_empty());
}

#[test]
fn test_measurement_requires_open_device() {
    let mut runtime = Runtime::new(processor(), active_pid(), Box::new(OfflineDac::new()));
    assert!(matches!(
        runtime.start_measurement(Box::<EdgeSpectrometer>::default(), Duration::from_millis(5)),
        Err(RuntimeError::Device(DeviceError::NotOpen))
    ));
    assert!(!runtime.is_measuring());
}
