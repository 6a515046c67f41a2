use std::io;

use crate::analysis::AnalysisError;
use crate::device::DeviceError;
use crate::pid::PidError;

/// Errors raised by the measurement and PID loops
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The loop is already running
    #[error("{0} loop is already running")]
    AlreadyRunning(&'static str),

    /// The spectrometer reports itself removed
    #[error("Device removed")]
    SpectrometerRemoved,

    /// Initial heater voltage is negative or not a number
    #[error("Invalid initial voltage: {0}")]
    InvalidVoltage(f64),

    /// Shared state was poisoned by a panicking thread
    #[error("{0} state poisoned")]
    Poisoned(&'static str),

    /// A loop thread panicked
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),

    /// Driver error
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Analysis error
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Controller rejected a setting
    #[error("PID error: {0}")]
    Pid(#[from] PidError),

    /// Thread could not be spawned
    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] io::Error),
}
