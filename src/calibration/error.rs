use crate::data_file::DataFileError;
use crate::fit::FitError;

/// Errors raised while building a calibration
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    /// Calibration table could not be read
    #[error("Calibration file error: {0}")]
    DataFile(#[from] DataFileError),

    /// Control points do not define a spline
    #[error("Invalid calibration points: {0}")]
    Points(#[from] FitError),

    /// Polynomial without coefficients
    #[error("Polynomial calibration needs at least one coefficient")]
    NoCoefficients,

    /// Non-finite value in the calibration data
    #[error("Non-finite calibration value at row {0}")]
    NonFinite(usize),

    /// Sampling range and step would produce too many points
    #[error("Sampling {from}..{to} every {step} exceeds the point limit")]
    TooManySamples {
        /// First wavelength
        from: f64,
        /// Last wavelength
        to: f64,
        /// Wavelength step
        step: f64,
    },
}
