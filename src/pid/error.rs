use std::fmt;

use serde::Serialize;

/// User-entered PID setting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PidField {
    /// Proportional constant
    P,
    /// Integral constant
    I,
    /// Derivative constant
    D,
    /// Target temperature
    SetPoint,
    /// Set point ramp in °C per minute
    Ramp,
    /// Largest voltage change per tick
    MaxVoltageStep,
    /// Number of samples averaged by the controller
    BufferLength,
}

impl fmt::Display for PidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PidField::P => "P const",
            PidField::I => "I const",
            PidField::D => "D const",
            PidField::SetPoint => "Set point",
            PidField::Ramp => "Ramp",
            PidField::MaxVoltageStep => "Max voltage step",
            PidField::BufferLength => "Buffer length",
        };
        f.write_str(name)
    }
}

/// Errors raised by the PID controller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PidError {
    /// A setting is not a number or lies outside its domain
    #[error("{field} error: '{value}' {reason}")]
    InvalidParameter {
        /// Offending setting
        field: PidField,
        /// Text as entered
        value: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Tick period must be positive and finite
    #[error("Invalid PID period: {0} s")]
    InvalidPeriod(f64),
}
