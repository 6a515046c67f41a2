//! # PID heater controller
//!
//! Closes the temperature loop: every tick the latest temperature is compared
//! to a set point that ramps towards the target at a configurable rate, and a
//! new heater voltage is derived from the mean error, its integral and the
//! slope of the recent errors.
//!
//! The output is always within `[0, V_MAX]` and never changes by more than
//! the configured maximum step per tick.

mod buffer;
mod controller;
mod error;

#[cfg(test)]
mod tests;

pub use buffer::SlidingBuffer;
pub use controller::{
    PidController, PidGains, PidOutput, PidParameters, PidState, DEFAULT_MAX_VOLTAGE_STEP, V_MAX,
};
pub use error::{PidError, PidField};
