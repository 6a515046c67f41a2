use std::io;

use crate::data_file::DataFileError;

/// Errors raised by instrument drivers
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// No device was selected before opening it
    #[error("No spectrometer selected")]
    NotSelected,

    /// The device must be opened first
    #[error("Spectrometer is not open")]
    NotOpen,

    /// Selected device index does not exist
    #[error("Device index {index} out of range: {found} device(s) found")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Number of devices found by the last search
        found: usize,
    },

    /// DAC channel outside `1..=channels`
    #[error("DAC channel {channel} out of range 1..={channels}")]
    InvalidChannel {
        /// Requested channel
        channel: usize,
        /// Channel count of the converter
        channels: usize,
    },

    /// Voltage is not a finite number
    #[error("Invalid voltage: {0}")]
    InvalidVoltage(f64),

    /// The driver for this kind of device is not part of this build
    #[error("{0} driver is not available")]
    NotAvailable(String),

    /// Replay device was given no spectra
    #[error("No spectra to replay")]
    NothingToReplay,

    /// A replayed spectrum could not be read
    #[error("Replay error: {0}")]
    DataFile(#[from] DataFileError),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}
