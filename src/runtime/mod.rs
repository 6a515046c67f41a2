//! # Measurement and heater loops
//!
//! [`Runtime`] drives two timers on background threads:
//!
//! - the measurement loop starts an exposure every period, feeds finished
//!   readings to the shared [`SpectraProcessor`](crate::analysis::SpectraProcessor)
//!   and keeps going when an edge is not found or the device goes missing;
//! - the PID loop regulates the heater on the latest recorded temperature.
//!
//! ```text
//! ┌──────────────┐ reading  ┌──────────────────────────┐ history ┌───────────┐
//! │ Spectrometer │ ───────▶ │ Mutex<SpectraProcessor>  │ ──────▶ │ PID loop  │ ──▶ DAC
//! └──────────────┘          └──────────────────────────┘         └───────────┘
//! ```
//!
//! The single steps, [`measurement_step`] and [`pid_step`], are public so the
//! loops can also be driven by hand.

mod error;
mod session;
mod steps;

#[cfg(test)]
mod tests;

pub use error::RuntimeError;
pub use session::{PidStart, Runtime};
pub use steps::{
    measurement_step, pid_step, HEATER_CHANNEL, TEMPERATURE_CHANNEL, TEMPERATURE_SCALE,
};
