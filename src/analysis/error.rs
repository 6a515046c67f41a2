use crate::accumulator::AccumulatorError;
use crate::edge::EdgeError;

/// Errors raised by the spectrum analysis pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// No calibration is selected; temperatures cannot be computed
    #[error("No calibration selected")]
    CalibrationMissing,

    /// The absorption edge could not be located in the spectrum
    #[error("Edge not found: {0}")]
    EdgeNotFound(#[from] EdgeError),

    /// The exposure could not be folded into the running average
    #[error("Accumulator error: {0}")]
    Accumulator(#[from] AccumulatorError),

    /// Re-analysis was requested before any spectrum was analysed
    #[error("No spectrum to re-analyse")]
    NoSpectrum,
}
