use crate::spectrum::SpectrumError;

/// Errors raised by the spectrum accumulator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccumulatorError {
    /// Intensity array does not match the buffered spectrum
    #[error("Intensity length mismatch: buffer holds {expected} points, got {found}")]
    Length {
        /// Length of the buffered spectrum
        expected: usize,
        /// Length of the loaded intensities
        found: usize,
    },

    /// Averaged data do not form a valid spectrum
    #[error("Invalid spectrum: {0}")]
    Spectrum(#[from] SpectrumError),

    /// Target count must be at least one
    #[error("Averaging target must be at least 1")]
    ZeroTarget,

    /// Mean timestamp is out of the representable range
    #[error("Mean timestamp out of range")]
    TimestampOutOfRange,
}
