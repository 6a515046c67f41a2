use std::sync::{Mutex, MutexGuard};

use log::{debug, info};

use crate::analysis::{Analysis, SpectraProcessor};
use crate::device::{Dac, Spectrometer};
use crate::pid::{PidController, PidOutput, PidState};

use super::RuntimeError;

/// DAC channel mirroring the measured temperature
pub const TEMPERATURE_CHANNEL: usize = 1;

/// DAC channel driving the heater
pub const HEATER_CHANNEL: usize = 2;

/// Volts written to [`TEMPERATURE_CHANNEL`] per °C
pub const TEMPERATURE_SCALE: f64 = 0.01;

pub(crate) fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    name: &'static str,
) -> Result<MutexGuard<'a, T>, RuntimeError> {
    mutex.lock().map_err(|_| RuntimeError::Poisoned(name))
}

/// One tick of the measurement loop.
///
/// Collects the reading of the previous exposure, if it has finished, feeds
/// it to the processor and starts the next exposure. `reset_now` forces the
/// pending average to flush with this reading.
pub fn measurement_step(
    spectrometer: &mut dyn Spectrometer,
    processor: &Mutex<SpectraProcessor>,
    reset_now: bool,
) -> Result<Option<Analysis>, RuntimeError> {
    if spectrometer.is_removed() {
        return Err(RuntimeError::SpectrometerRemoved);
    }

    let analysis = match spectrometer.current_reading()? {
        Some(reading) => {
            debug!("Reading of {} points at {}", reading.wavelengths.len(), reading.timestamp);
            let mut processor = lock(processor, "processor")?;
            processor.load(
                &reading.wavelengths,
                &reading.intensities,
                reading.timestamp,
                reset_now,
            )?
        }
        None => None,
    };

    spectrometer.start_exposure()?;
    Ok(analysis)
}

/// One tick of the PID loop.
///
/// Regulates on the latest recorded temperature: channel 1 mirrors it as
/// `T / 100` volts without persisting, channel 2 receives the new heater
/// voltage. Returns `None` when the controller is idle or nothing has been
/// measured yet.
pub fn pid_step(
    processor: &Mutex<SpectraProcessor>,
    pid: &Mutex<PidController>,
    dac: &mut dyn Dac,
) -> Result<Option<PidOutput>, RuntimeError> {
    let Some((elapsed, temperature)) = lock(processor, "processor")?.history().last() else {
        debug!("PID tick without temperature");
        return Ok(None);
    };

    let output = {
        let mut pid = lock(pid, "PID")?;
        if pid.state() == PidState::Idle {
            return Ok(None);
        }
        pid.tick(elapsed, temperature, dac.last_written_value())
    };

    dac.set_voltage(TEMPERATURE_CHANNEL, temperature * TEMPERATURE_SCALE, false)?;
    dac.set_voltage(HEATER_CHANNEL, output.voltage, true)?;
    info!("PID {:.2} V ({})", output.voltage, output.status);
    Ok(Some(output))
}
