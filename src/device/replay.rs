use std::path::PathBuf;

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::data_file::read_columns;

use super::offline::Exposure;
use super::{DeviceError, Reading, Spectrometer};

/// Replay spectrometer settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    /// Two-column spectra files, replayed in order
    pub files: Vec<PathBuf>,
    /// Start over after the last file instead of reporting removal
    pub repeat: bool,
    /// Exposure duration in seconds
    pub exposure_seconds: f64,
}

/// Spectrometer that plays back saved spectra files.
///
/// Every finished exposure reads the next file and stamps it with the
/// current time. Once all files are played, the device reports itself
/// removed unless `repeat` is set.
#[derive(Debug)]
pub struct ReplaySpectrometer {
    settings: ReplaySettings,
    next: usize,
    selected: bool,
    open: bool,
    exposure: Exposure,
}

impl ReplaySpectrometer {
    /// Create a replay device
    pub fn new(settings: ReplaySettings) -> Result<Self, DeviceError> {
        if settings.files.is_empty() {
            return Err(DeviceError::NothingToReplay);
        }
        let exposure = Exposure::new(settings.exposure_seconds);
        Ok(Self {
            settings,
            next: 0,
            selected: false,
            open: false,
            exposure,
        })
    }

    /// Number of files already played
    pub fn played(&self) -> usize {
        self.next
    }

    fn exhausted(&self) -> bool {
        !self.settings.repeat && self.next >= self.settings.files.len()
    }
}

impl Spectrometer for ReplaySpectrometer {
    fn model_name(&self) -> &str {
        "Replay"
    }

    fn serial_number(&self) -> &str {
        "replay"
    }

    fn search(&mut self) -> Result<usize, DeviceError> {
        Ok(1)
    }

    fn select(&mut self, index: usize) -> Result<(), DeviceError> {
        if index != 0 {
            return Err(DeviceError::InvalidIndex { index, found: 1 });
        }
        self.selected = true;
        Ok(())
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if !self.selected {
            return Err(DeviceError::NotSelected);
        }
        self.open = true;
        info!("Replaying {} spectra", self.settings.files.len());
        Ok(())
    }

    fn close(&mut self) {
        self.exposure.cancel();
        self.open = false;
    }

    fn start_exposure(&mut self) -> Result<(), DeviceError> {
        if !self.open {
            return Err(DeviceError::NotOpen);
        }
        self.exposure.start();
        Ok(())
    }

    fn cancel_exposure(&mut self) {
        self.exposure.cancel();
    }

    fn is_removed(&self) -> bool {
        !self.selected || self.exhausted()
    }

    fn exposure_seconds(&self) -> f64 {
        self.settings.exposure_seconds
    }

    fn current_reading(&mut self) -> Result<Option<Reading>, DeviceError> {
        if !self.open {
            return Err(DeviceError::NotOpen);
        }
        if self.exhausted() || !self.exposure.take_finished() {
            return Ok(None);
        }

        let path = &self.settings.files[self.next % self.settings.files.len()];
        debug!("Replaying {}", path.display());
        let columns = read_columns(path)?;
        self.next += 1;
        Ok(Some(Reading {
            wavelengths: columns.first,
            intensities: columns.second,
            timestamp: Utc::now(),
        }))
    }
}
