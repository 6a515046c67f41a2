//! # Fitting primitives
//!
//! Closed-form least-squares line fits, the coefficient of determination, a
//! natural cubic spline with analytic derivative, and polynomial evaluation.
//! These are the numerical building blocks of the edge locator, the
//! calibration curves and the PID derivative estimate.

mod error;
mod line;
mod spline;


pub use error::FitError;
pub use line::{fit_line, fit_range, polynomial_eval, r_squared, FitResult};
pub use spline::CubicSpline;
