use log::{debug, info, warn};
use serde::Serialize;

use crate::fit::fit_line;

use super::{PidError, PidField, SlidingBuffer};

/// Control voltage for full heater drive, in volts
pub const V_MAX: f64 = 5.3;

/// Default largest voltage change per tick, in volts
pub const DEFAULT_MAX_VOLTAGE_STEP: f64 = 0.1;

/// Effective gains derived from the user-entered constants
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PidGains {
    /// Proportional gain, `1 / raw_p`
    pub p: f64,
    /// Integral gain, `p / raw_i` (zero when `raw_i` is zero)
    pub i: f64,
    /// Derivative gain, `p * raw_d`
    pub d: f64,
}

impl PidGains {
    /// Derive the effective gains from raw constants.
    ///
    /// `raw_p` is a proportional band: larger values mean weaker control.
    pub fn from_raw(raw_p: f64, raw_i: f64, raw_d: f64) -> Self {
        let p = 1.0 / raw_p;
        let i = if raw_i == 0.0 { 0.0 } else { p / raw_i };
        Self { p, i, d: p * raw_d }
    }
}

/// Validated controller settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PidParameters {
    /// Effective gains
    pub gains: PidGains,
    /// Target temperature in °C
    pub set_point: f64,
    /// Set point ramp in °C per minute
    pub ramp: f64,
    /// Largest voltage change per tick
    pub max_voltage_step: f64,
    /// Number of (time, error) samples the controller averages over
    pub buffer_length: usize,
}

impl PidParameters {
    /// Parse user-entered settings.
    ///
    /// Decimal commas are accepted. The first invalid field is reported.
    #[allow(clippy::too_many_arguments)]
    pub fn parse(
        raw_p: &str,
        raw_i: &str,
        raw_d: &str,
        set_point: &str,
        ramp: &str,
        max_voltage_step: &str,
        buffer_length: &str,
    ) -> Result<Self, PidError> {
        let length = buffer_length
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid(PidField::BufferLength, buffer_length, "is not a whole number"))?;

        Self::from_raw(
            parse_number(PidField::P, raw_p)?,
            parse_number(PidField::I, raw_i)?,
            parse_number(PidField::D, raw_d)?,
            parse_number(PidField::SetPoint, set_point)?,
            parse_number(PidField::Ramp, ramp)?,
            parse_number(PidField::MaxVoltageStep, max_voltage_step)?,
            length,
        )
    }

    /// Validate numeric settings and derive the effective gains
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        raw_p: f64,
        raw_i: f64,
        raw_d: f64,
        set_point: f64,
        ramp: f64,
        max_voltage_step: f64,
        buffer_length: usize,
    ) -> Result<Self, PidError> {
        if !(raw_p > 0.0) || !raw_p.is_finite() {
            return Err(invalid(PidField::P, raw_p, "must be positive"));
        }
        check_non_negative(PidField::I, raw_i)?;
        check_non_negative(PidField::D, raw_d)?;
        if !set_point.is_finite() {
            return Err(invalid(PidField::SetPoint, set_point, "must be finite"));
        }
        check_non_negative(PidField::Ramp, ramp)?;
        check_non_negative(PidField::MaxVoltageStep, max_voltage_step)?;
        if buffer_length < 2 {
            return Err(invalid(
                PidField::BufferLength,
                buffer_length,
                "must be at least 2",
            ));
        }

        Ok(Self {
            gains: PidGains::from_raw(raw_p, raw_i, raw_d),
            set_point,
            ramp,
            max_voltage_step,
            buffer_length,
        })
    }
}

fn invalid(field: PidField, value: impl ToString, reason: &'static str) -> PidError {
    PidError::InvalidParameter {
        field,
        value: value.to_string(),
        reason,
    }
}

fn parse_number(field: PidField, text: &str) -> Result<f64, PidError> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| invalid(field, text, "is not a number"))
}

fn check_non_negative(field: PidField, value: f64) -> Result<(), PidError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must not be negative"))
    }
}

/// Controller state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum PidState {
    /// Not regulating; ticks leave the voltage alone
    #[default]
    Idle,
    /// Regulating at the fixed tick period
    Active,
}

/// Result of one controller tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PidOutput {
    /// Voltage to write to the heater DAC channel
    pub voltage: f64,
    /// `"<actual set point> °C => <set point> °C"`
    pub status: String,
}

/// Heater controller with ramped set point and rate-limited output.
///
/// The error used by the controller is the mean of the last
/// `buffer_length` errors, and its derivative is the slope of a line fitted
/// to those (time, error) samples. No output is produced until the buffer is
/// full.
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,
    set_point: f64,
    actual_set_point: f64,
    ramp: f64,
    max_voltage_step: f64,
    period: f64,
    integral: f64,
    buffer: SlidingBuffer<(f64, f64)>,
    state: PidState,
}

impl PidController {
    /// Create an idle controller ticking every `period` seconds
    pub fn new(buffer_length: usize, period: f64) -> Result<Self, PidError> {
        if buffer_length < 2 {
            return Err(invalid(
                PidField::BufferLength,
                buffer_length,
                "must be at least 2",
            ));
        }
        check_period(period)?;
        Ok(Self {
            gains: PidGains::default(),
            set_point: 0.0,
            actual_set_point: 0.0,
            ramp: 0.0,
            max_voltage_step: DEFAULT_MAX_VOLTAGE_STEP,
            period,
            integral: 0.0,
            buffer: SlidingBuffer::new(buffer_length),
            state: PidState::Idle,
        })
    }

    /// Parse and apply user-entered settings.
    ///
    /// Either every setting is applied or, on error, none is.
    #[allow(clippy::too_many_arguments)]
    pub fn parameters_check(
        &mut self,
        raw_p: &str,
        raw_i: &str,
        raw_d: &str,
        set_point: &str,
        ramp: &str,
        max_voltage_step: &str,
        buffer_length: &str,
    ) -> Result<(), PidError> {
        let params = PidParameters::parse(
            raw_p,
            raw_i,
            raw_d,
            set_point,
            ramp,
            max_voltage_step,
            buffer_length,
        )?;
        self.apply(params);
        Ok(())
    }

    /// Apply validated settings
    pub fn apply(&mut self, params: PidParameters) {
        debug!("PID parameters: {:?}", params);
        self.gains = params.gains;
        self.set_point = params.set_point;
        self.ramp = params.ramp;
        self.max_voltage_step = params.max_voltage_step;
        self.buffer.resize(params.buffer_length);
    }

    /// Change the tick period
    pub fn set_period(&mut self, period: f64) -> Result<(), PidError> {
        check_period(period)?;
        self.period = period;
        Ok(())
    }

    /// Tick period in seconds
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Effective gains
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Target temperature
    pub fn set_point(&self) -> f64 {
        self.set_point
    }

    /// Ramped set point the controller currently regulates to
    pub fn actual_set_point(&self) -> f64 {
        self.actual_set_point
    }

    /// Largest voltage change per tick
    pub fn max_voltage_step(&self) -> f64 {
        self.max_voltage_step
    }

    /// Accumulated integral term
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Current state
    pub fn state(&self) -> PidState {
        self.state
    }

    /// Start regulating from `temperature`: the ramp starts there and the
    /// integral is cleared.
    pub fn reset(&mut self, temperature: f64) {
        self.actual_set_point = temperature;
        self.integral = 0.0;
        self.state = PidState::Active;
        info!(
            "PID started at {:.1} °C, set point {:.1} °C",
            temperature, self.set_point
        );
    }

    /// Stop regulating
    pub fn stop(&mut self) {
        if self.state == PidState::Active {
            info!("PID stopped");
        }
        self.state = PidState::Idle;
    }

    /// One control step.
    ///
    /// `elapsed` is the time of the temperature reading in seconds,
    /// `previous_voltage` the voltage currently applied. When idle the
    /// previous voltage is returned and nothing changes. Non-finite samples
    /// are not buffered and keep the previous voltage.
    pub fn tick(&mut self, elapsed: f64, temperature: f64, previous_voltage: f64) -> PidOutput {
        if self.state == PidState::Idle {
            return PidOutput {
                voltage: previous_voltage,
                status: "PID idle".to_string(),
            };
        }

        self.advance_set_point();
        let status = format!(
            "{:.1} °C => {:.1} °C",
            self.actual_set_point, self.set_point
        );

        if !temperature.is_finite() || !elapsed.is_finite() {
            warn!(
                "Ignoring non-finite PID sample ({} °C at {} s)",
                temperature, elapsed
            );
            return PidOutput {
                voltage: previous_voltage,
                status,
            };
        }

        self.buffer.push((elapsed, self.actual_set_point - temperature));
        if !self.buffer.is_full() {
            return PidOutput {
                voltage: previous_voltage,
                status,
            };
        }

        let (times, errors): (Vec<f64>, Vec<f64>) = self.buffer.iter().copied().unzip();
        let error = errors.iter().sum::<f64>() / errors.len() as f64;
        let derivative = match fit_line(&times, &errors) {
            Ok((_, slope)) => slope,
            Err(e) => {
                debug!("No error derivative ({}), using 0", e);
                0.0
            }
        };

        let PidGains { p, i, d } = self.gains;
        if self.integral == 0.0 && i != 0.0 {
            // Continue from the applied voltage on (re)start
            self.integral = (previous_voltage / V_MAX - p * error - d * derivative) / i;
        } else {
            self.integral += error * self.period;
        }

        let mut voltage = (V_MAX * (p * error + i * self.integral + d * derivative)).clamp(0.0, V_MAX);
        if !voltage.is_finite() {
            warn!("PID output not finite (error {}), keeping voltage", error);
            voltage = previous_voltage;
        }
        let step = voltage - previous_voltage;
        if step > self.max_voltage_step {
            voltage = previous_voltage + self.max_voltage_step;
        } else if step < -self.max_voltage_step {
            voltage = previous_voltage - self.max_voltage_step;
        }
        let voltage = voltage.clamp(0.0, V_MAX);

        debug!(
            "PID tick t={:.1}s err={:.3} dErr={:.4} integral={:.3} -> {:.3} V",
            elapsed, error, derivative, self.integral, voltage
        );
        PidOutput { voltage, status }
    }

    fn advance_set_point(&mut self) {
        let step = self.ramp * self.period / 60.0;
        if self.actual_set_point < self.set_point {
            self.actual_set_point = (self.actual_set_point + step).min(self.set_point);
        } else {
            self.actual_set_point = (self.actual_set_point - step).max(self.set_point);
        }
    }
}

fn check_period(period: f64) -> Result<(), PidError> {
    if period > 0.0 && period.is_finite() {
        Ok(())
    } else {
        Err(PidError::InvalidPeriod(period))
    }
}
