use crate::fit::FitError;

/// Errors raised while locating the absorption edge
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EdgeError {
    /// Inchworm was started on a range whose left end lies right of its
    /// right end, or outside the data
    #[error("Invalid index range {start}..={end} for {len} points")]
    InvalidRange {
        /// Left end of the range
        start: usize,
        /// Right end of the range (inclusive)
        end: usize,
        /// Number of points in the spectrum
        len: usize,
    },

    /// A line fit was undefined
    #[error("Fit error: {0}")]
    Fit(#[from] FitError),

    /// The two lines do not yield a usable intersection
    #[error("Absorption edge not found: {0}")]
    NotFound(String),
}
