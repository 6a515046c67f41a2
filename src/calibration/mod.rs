//! # Wavelength to temperature calibration
//!
//! A [`Calibration`] maps an absorption-edge wavelength to the sample
//! temperature. Two kinds exist:
//!
//! - **Point interpolation**: a natural cubic spline through measured
//!   (edge wavelength, temperature) pairs. It passes exactly through every
//!   control point and is extrapolated, not clamped, outside them.
//! - **Polynomial**: coefficients in ascending powers of the wavelength.
//!
//! Calibrations are immutable once built and can be shared between threads.
//!
//! ```rust
//! use specthermo::calibration::Calibration;
//!
//! let calibration = Calibration::polynomial(vec![-400.0, 1.0])?;
//! assert_eq!(calibration.apply(Some(420.0)), Some(20.0));
//! assert_eq!(calibration.apply(None), None);
//! # Ok::<(), specthermo::calibration::CalibrationError>(())
//! ```

mod error;

#[cfg(test)]
mod tests;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data_file::read_columns;
use crate::fit::{polynomial_eval, CubicSpline};

pub use error::CalibrationError;

/// Most points [`Calibration::sample`] produces
pub const MAX_SAMPLES: usize = 1_000_000;

/// How the rows of a calibration file are interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationKind {
    /// Rows are (edge wavelength, temperature) control points (`calib_points`)
    Points,
    /// The second column holds polynomial coefficients, lowest power first
    /// (`calib_polynom`)
    Polynomial,
}

/// Wavelength to temperature mapping
#[derive(Debug, Clone)]
pub enum Calibration {
    /// Cubic spline through control points
    PointInterpolation {
        /// Edge wavelengths of the control points
        wavelengths: Vec<f64>,
        /// Temperatures of the control points
        temperatures: Vec<f64>,
        /// Interpolant
        spline: CubicSpline,
    },
    /// Polynomial in the wavelength
    Polynomial {
        /// Coefficients, lowest power first
        coefficients: Vec<f64>,
    },
}

impl Calibration {
    /// Spline calibration through `(wavelengths[i], temperatures[i])`.
    ///
    /// Wavelengths must be strictly increasing.
    pub fn points(
        wavelengths: Vec<f64>,
        temperatures: Vec<f64>,
    ) -> Result<Self, CalibrationError> {
        check_finite(&wavelengths)?;
        check_finite(&temperatures)?;
        let spline = CubicSpline::new(&wavelengths, &temperatures)?;
        Ok(Calibration::PointInterpolation {
            wavelengths,
            temperatures,
            spline,
        })
    }

    /// Polynomial calibration, coefficients in ascending powers
    pub fn polynomial(coefficients: Vec<f64>) -> Result<Self, CalibrationError> {
        if coefficients.is_empty() {
            return Err(CalibrationError::NoCoefficients);
        }
        check_finite(&coefficients)?;
        Ok(Calibration::Polynomial { coefficients })
    }

    /// Load a calibration table of the given kind
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        kind: CalibrationKind,
    ) -> Result<Self, CalibrationError> {
        let columns = read_columns(path)?;
        match kind {
            CalibrationKind::Points => Self::points(columns.first, columns.second),
            CalibrationKind::Polynomial => Self::polynomial(columns.second),
        }
    }

    /// Short name of the calibration kind
    pub fn kind(&self) -> CalibrationKind {
        match self {
            Calibration::PointInterpolation { .. } => CalibrationKind::Points,
            Calibration::Polynomial { .. } => CalibrationKind::Polynomial,
        }
    }

    /// Temperature at `wavelength`
    pub fn temperature(&self, wavelength: f64) -> f64 {
        match self {
            Calibration::PointInterpolation { spline, .. } => spline.evaluate(wavelength),
            Calibration::Polynomial { coefficients } => polynomial_eval(coefficients, wavelength),
        }
    }

    /// Temperature for an edge wavelength that may be unknown.
    ///
    /// An unknown wavelength gives an unknown temperature.
    pub fn apply(&self, wavelength: Option<f64>) -> Option<f64> {
        wavelength.map(|w| self.temperature(w))
    }

    /// Evaluate the curve on `from, from + step, ..` up to and including `to`.
    ///
    /// Returns empty vectors when `step` is not positive or `to < from`, and
    /// an error when more than [`MAX_SAMPLES`] points would be produced.
    pub fn sample(
        &self,
        from: f64,
        to: f64,
        step: f64,
    ) -> Result<(Vec<f64>, Vec<f64>), CalibrationError> {
        if !(step > 0.0) || !(to >= from) {
            return Ok((Vec::new(), Vec::new()));
        }
        let intervals = ((to - from) / step + 1e-9).floor();
        if !(intervals < MAX_SAMPLES as f64) {
            return Err(CalibrationError::TooManySamples {
                from,
                to,
                step,
            });
        }
        let count = intervals as usize + 1;
        let wavelengths: Vec<f64> = (0..count).map(|i| from + i as f64 * step).collect();
        let temperatures = wavelengths.iter().map(|&w| self.temperature(w)).collect();
        Ok((wavelengths, temperatures))
    }
}

fn check_finite(values: &[f64]) -> Result<(), CalibrationError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(row) => Err(CalibrationError::NonFinite(row)),
        None => Ok(()),
    }
}
