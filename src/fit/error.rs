/// Errors raised by the fitting primitives
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// The fit is undefined for the given points (fewer than two points,
    /// zero variance in x, or a vertical line)
    #[error("Degenerate fit: {0}")]
    Degenerate(String),

    /// Abscissa and ordinate arrays differ in length
    #[error("Length mismatch: {xs} x values, {ys} y values")]
    LengthMismatch {
        /// Number of x values
        xs: usize,
        /// Number of y values
        ys: usize,
    },

    /// Requested index range lies outside the data
    #[error("Range {start}..={end} out of bounds for {len} points")]
    OutOfBounds {
        /// First index of the range
        start: usize,
        /// Last index of the range (inclusive)
        end: usize,
        /// Number of available points
        len: usize,
    },
}
