//! # Instrument drivers
//!
//! The measurement chain talks to hardware through two capability traits:
//! [`Spectrometer`] delivers spectra and [`Dac`] drives the heater. Concrete
//! drivers are chosen at startup from a [`SpectrometerKind`] / [`DacKind`]
//! with [`create_spectrometer`] and [`create_dac`].
//!
//! Bundled drivers:
//!
//! - [`OfflineSpectrometer`]: a fixed 40-point absorption edge with uniform
//!   noise, for running without hardware
//! - [`ReplaySpectrometer`]: plays back saved two-column spectra files
//! - [`OfflineDac`]: a three-channel converter that only records voltages

mod dac;
mod error;
mod offline;
mod replay;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

pub use dac::{OfflineDac, OFFLINE_DAC_CHANNELS};
pub use error::DeviceError;
pub use offline::{OfflineSettings, OfflineSpectrometer, OFFLINE_INTENSITIES, OFFLINE_WAVELENGTHS};
pub use replay::{ReplaySettings, ReplaySpectrometer};

/// One finished exposure
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Wavelengths in nm
    pub wavelengths: Vec<f64>,
    /// Intensities, one per wavelength
    pub intensities: Vec<f64>,
    /// Acquisition time
    pub timestamp: DateTime<Utc>,
}

/// Spectrometer capabilities used by the measurement loop
pub trait Spectrometer: Send {
    /// Device model
    fn model_name(&self) -> &str;

    /// Device serial number
    fn serial_number(&self) -> &str;

    /// Look for attached devices; returns how many were found
    fn search(&mut self) -> Result<usize, DeviceError>;

    /// Choose one of the devices found by [`search`](Self::search)
    fn select(&mut self, index: usize) -> Result<(), DeviceError>;

    /// Open the selected device
    fn open(&mut self) -> Result<(), DeviceError>;

    /// Close the device, cancelling any exposure
    fn close(&mut self);

    /// Begin an exposure
    fn start_exposure(&mut self) -> Result<(), DeviceError>;

    /// Abort the running exposure
    fn cancel_exposure(&mut self);

    /// Whether the device has gone away
    fn is_removed(&self) -> bool;

    /// Exposure duration in seconds
    fn exposure_seconds(&self) -> f64;

    /// The reading of the last exposure once it has finished.
    ///
    /// Returns `Ok(None)` while exposing or when no exposure was started.
    /// Each finished exposure is returned once.
    fn current_reading(&mut self) -> Result<Option<Reading>, DeviceError>;
}

/// Digital-to-analog converter driving the heater
pub trait Dac: Send {
    /// Number of output channels
    fn channels(&self) -> usize;

    /// Set `channel` (1-based) to `volts`.
    ///
    /// Only persisted writes update [`last_written_value`](Self::last_written_value).
    fn set_voltage(&mut self, channel: usize, volts: f64, persist: bool) -> Result<(), DeviceError>;

    /// Voltage currently on `channel` (1-based)
    fn voltage(&self, channel: usize) -> Option<f64>;

    /// Last persisted voltage
    fn last_written_value(&self) -> f64;
}

/// Spectrometer driver selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpectrometerKind {
    /// Built-in simulator
    Offline(OfflineSettings),
    /// Saved spectra played back in order
    Replay(ReplaySettings),
}

impl Default for SpectrometerKind {
    fn default() -> Self {
        SpectrometerKind::Offline(OfflineSettings::default())
    }
}

/// DAC driver selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DacKind {
    /// Serial-port converter of the lab setup
    Lab,
    /// In-memory converter
    #[default]
    Offline,
}

impl DacKind {
    /// Parse a configuration value; unknown names fall back to offline.
    pub fn from_config_value(value: &str) -> Self {
        match value {
            "lab" => DacKind::Lab,
            "offline" => DacKind::Offline,
            other => {
                warn!("Unknown DAC '{}', using offline", other);
                DacKind::Offline
            }
        }
    }
}

/// Instantiate the selected spectrometer driver
pub fn create_spectrometer(kind: &SpectrometerKind) -> Result<Box<dyn Spectrometer>, DeviceError> {
    match kind {
        SpectrometerKind::Offline(settings) => {
            Ok(Box::new(OfflineSpectrometer::new(settings.clone())))
        }
        SpectrometerKind::Replay(settings) => {
            Ok(Box::new(ReplaySpectrometer::new(settings.clone())?))
        }
    }
}

/// Instantiate the selected DAC driver.
///
/// The lab converter needs a serial driver that this crate does not ship.
pub fn create_dac(kind: DacKind) -> Result<Box<dyn Dac>, DeviceError> {
    match kind {
        DacKind::Lab => Err(DeviceError::NotAvailable("Lab DAC".to_string())),
        DacKind::Offline => Ok(Box::new(OfflineDac::new())),
    }
}

/// Search, select the first device and open it
pub fn connect(spectrometer: &mut dyn Spectrometer) -> Result<(), DeviceError> {
    let found = spectrometer.search()?;
    if found == 0 {
        return Err(DeviceError::InvalidIndex { index: 0, found });
    }
    spectrometer.select(0)?;
    spectrometer.open()
}
