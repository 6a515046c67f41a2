//! # Spectrum accumulator
//!
//! Folds consecutive exposures into one averaged spectrum. Intensities and
//! acquisition times are summed; once the target number of exposures is
//! reached the sum is despiked, divided by the count and returned together
//! with the mean timestamp, and the buffer starts over.

mod buffer;
mod error;


pub use buffer::SpectrumAccumulator;
pub use error::AccumulatorError;
