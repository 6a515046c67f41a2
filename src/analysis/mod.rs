//! # Spectrum analysis pipeline
//!
//! [`SpectraProcessor`] ties the measurement chain together: exposures go
//! into the [`SpectrumAccumulator`](crate::accumulator::SpectrumAccumulator),
//! every averaged spectrum is searched for its absorption edge, the edge
//! wavelength is converted by the selected
//! [`Calibration`](crate::calibration::Calibration) and the temperature is
//! appended to the [`TemperatureHistory`](crate::history::TemperatureHistory).
//!
//! Accumulator, edge search memory and history change together and must be
//! guarded as one unit when shared between threads. Consumers that want to
//! follow the results (plotting, logging, saving) can subscribe with a
//! `crossbeam_channel::Sender<AnalysisEvent>`.

mod error;
mod event;
mod processor;


pub use error::AnalysisError;
pub use event::{Analysis, AnalysisEvent};
pub use processor::SpectraProcessor;
