//! # Absorption edge locator
//!
//! Finds the wavelength at which two linear regimes of a transmission
//! spectrum intersect: the flat baseline before the edge and the steep edge
//! slope itself.
//!
//! ## Algorithm
//!
//! 1. Boxcar-smooth the intensities, interpolate them with a natural cubic
//!    spline and differentiate it at every sample. Smooth the derivative.
//! 2. Take the derivative maximum, either over the whole spectrum or, when a
//!    previous maximum is known, within a window around it (the edge drifts
//!    slowly between consecutive spectra).
//! 3. Grow a line fit outward from the maximum ("inchworm") while the fit
//!    quality holds. This is the edge line.
//! 4. Slide left from the edge line while the derivative keeps falling towards
//!    the baseline plateau, then fit the baseline line from there using the
//!    configured [`EdgeMethod`].
//! 5. The intersection of both lines is the absorption edge.
//!
//! ```rust
//! use specthermo::edge::{EdgeLocator, EdgeParameters, EdgeSearchState};
//! use specthermo::spectrum::Spectrum;
//!
//! let wavelengths: Vec<f64> = (0..100).map(f64::from).collect();
//! let intensities: Vec<f64> = wavelengths
//!     .iter()
//!     .map(|&w| if w < 50.0 { 100.0 } else { 100.0 + 50.0 * (w - 50.0) })
//!     .collect();
//! let spectrum = Spectrum::new(wavelengths, intensities)?;
//!
//! let locator = EdgeLocator::new(EdgeParameters::default());
//! let mut state = EdgeSearchState::default();
//! let edge = locator.locate(&spectrum, &mut state)?;
//! assert!((edge.wavelength - 50.0).abs() < 0.5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod graphics;
mod inchworm;
mod locator;
mod state;


pub use config::{EdgeMethod, EdgeParameters};
pub use error::EdgeError;
pub use graphics::{FitGraphics, LineSegment, Point};
pub use inchworm::{Direction, IndexRange, Inchworm};
pub use locator::{EdgeFit, EdgeLocator};
pub use state::EdgeSearchState;
