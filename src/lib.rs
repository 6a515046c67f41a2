//! # specthermo - Spectrometric Thermometer
//!
//! `specthermo` measures the temperature of a semiconductor sample from the
//! position of its optical absorption edge and regulates a heater to a set
//! point.
//!
//! ## Measurement chain
//!
//! 1. A [`Spectrometer`](device::Spectrometer) delivers transmission spectra.
//! 2. The [`SpectrumAccumulator`](accumulator::SpectrumAccumulator) averages a
//!    configurable number of exposures and removes single-pixel spikes.
//! 3. The [`EdgeLocator`](edge::EdgeLocator) fits the baseline and the edge
//!    slope and intersects them.
//! 4. A [`Calibration`](calibration::Calibration) converts the edge
//!    wavelength to °C, which is appended to the
//!    [`TemperatureHistory`](history::TemperatureHistory).
//! 5. The [`PidController`](pid::PidController) turns the latest temperature
//!    into a heater voltage written to a [`Dac`](device::Dac).
//!
//! Steps 2 to 4 are tied together by
//! [`SpectraProcessor`](analysis::SpectraProcessor); the
//! [`Runtime`](runtime::Runtime) runs the measurement and PID timers on
//! background threads.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::Utc;
//! use specthermo::prelude::*;
//!
//! let mut processor = SpectraProcessor::new(EdgeParameters::default(), 1)?;
//! processor.set_calibration(Some(Arc::new(Calibration::polynomial(vec![-30.0, 1.0])?)));
//!
//! let wavelengths: Vec<f64> = (0..100).map(f64::from).collect();
//! let intensities: Vec<f64> = wavelengths
//!     .iter()
//!     .map(|&w| if w < 50.0 { 100.0 } else { 100.0 + 50.0 * (w - 50.0) })
//!     .collect();
//!
//! let analysis = processor
//!     .load(&wavelengths, &intensities, Utc::now(), false)?
//!     .expect("one exposure per average");
//! assert!((analysis.temperature - 20.0).abs() < 0.5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Data files
//!
//! Spectra, calibration tables and exported histories are two-column text
//! files, see [`data_file`]. Configuration is read from TOML or from the
//! `key    value` line format, see [`config`].

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod accumulator;
pub mod analysis;
pub mod calibration;
pub mod config;
pub mod data_file;
pub mod device;
pub mod edge;
pub mod fit;
pub mod history;
pub mod pid;
pub mod runtime;
pub mod smoothing;
pub mod spectrum;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::accumulator::{AccumulatorError, SpectrumAccumulator};
    pub use crate::analysis::{Analysis, AnalysisError, AnalysisEvent, SpectraProcessor};
    pub use crate::calibration::{Calibration, CalibrationError, CalibrationKind};
    pub use crate::config::{Config, ConfigError, ConfigReport};
    pub use crate::data_file::{read_columns, write_columns, Columns, DataFileError};
    pub use crate::device::{
        create_dac, create_spectrometer, Dac, DacKind, DeviceError, OfflineDac,
        OfflineSpectrometer, Reading, ReplaySpectrometer, Spectrometer, SpectrometerKind,
    };
    pub use crate::edge::{
        EdgeError, EdgeFit, EdgeLocator, EdgeMethod, EdgeParameters, EdgeSearchState,
        FitGraphics,
    };
    pub use crate::fit::{fit_line, CubicSpline, FitError};
    pub use crate::history::TemperatureHistory;
    pub use crate::pid::{PidController, PidError, PidOutput, PidParameters, PidState};
    pub use crate::runtime::{PidStart, Runtime, RuntimeError};
    pub use crate::smoothing::{smooth_boxcar, smooth_point_peaks};
    pub use crate::spectrum::{AveragedSpectrum, Spectrum, SpectrumError};
}
