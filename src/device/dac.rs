use log::debug;

use super::{Dac, DeviceError};

/// Channel count of the simulated converter
pub const OFFLINE_DAC_CHANNELS: usize = 3;

/// In-memory converter that records what would be written
#[derive(Debug, Clone)]
pub struct OfflineDac {
    voltages: Vec<f64>,
    last_written: f64,
}

impl OfflineDac {
    /// Converter with all channels at 0 V
    pub fn new() -> Self {
        Self {
            voltages: vec![0.0; OFFLINE_DAC_CHANNELS],
            last_written: 0.0,
        }
    }
}

impl Default for OfflineDac {
    fn default() -> Self {
        Self::new()
    }
}

impl Dac for OfflineDac {
    fn channels(&self) -> usize {
        self.voltages.len()
    }

    fn set_voltage(&mut self, channel: usize, volts: f64, persist: bool) -> Result<(), DeviceError> {
        if channel == 0 || channel > self.voltages.len() {
            return Err(DeviceError::InvalidChannel {
                channel,
                channels: self.voltages.len(),
            });
        }
        if !volts.is_finite() {
            return Err(DeviceError::InvalidVoltage(volts));
        }
        self.voltages[channel - 1] = volts;
        if persist {
            self.last_written = volts;
        }
        debug!("DAC channel {} <- {:.3} V", channel, volts);
        Ok(())
    }

    fn voltage(&self, channel: usize) -> Option<f64> {
        channel
            .checked_sub(1)
            .and_then(|index| self.voltages.get(index))
            .copied()
    }

    fn last_written_value(&self) -> f64 {
        self.last_written
    }
}
