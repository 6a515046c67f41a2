use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{DeviceError, Reading, Spectrometer};

/// Wavelengths of the simulated spectrum in nm
pub const OFFLINE_WAVELENGTHS: [f64; 40] = [
    340.76, 348.23, 355.69, 363.14, 370.58, 378.01, 385.42, 392.82, 400.21, 407.58, 414.94,
    422.29, 429.63, 436.95, 444.26, 451.56, 458.84, 466.11, 473.37, 480.61, 487.84, 495.06,
    502.26, 509.45, 516.62, 523.78, 530.92, 538.05, 545.17, 552.27, 559.35, 566.43, 573.48,
    580.52, 587.55, 594.56, 601.55, 608.53, 615.49, 622.44,
];

/// Noise-free intensities of the simulated spectrum
pub const OFFLINE_INTENSITIES: [f64; 40] = [
    472.73, 763.36, 957.06, 937.53, 948.37, 945.34, 945.97, 966.77, 968.28, 995.38, 1051.58,
    1074.4, 1130.6, 1190.09, 1267.47, 1337.04, 1478.57, 1622.12, 1919.29, 2336.95, 2802.5,
    3144.17, 3502.72, 3757.55, 4106.9, 4538.17, 4785.19, 5327.49, 8148.4, 12310.5, 17653.87,
    19535.23, 20436.84, 21045.81, 21719.43, 22521.1, 23532.74, 24594.15, 25292.6, 25587.89,
];

/// Number of simulated devices a search finds
const OFFLINE_DEVICES: usize = 2;

/// Simulated spectrometer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineSettings {
    /// Amplitude of the uniform noise added to every intensity
    pub noise_amplitude: f64,
    /// Exposure duration in seconds
    pub exposure_seconds: f64,
    /// Noise seed; random when absent
    pub seed: Option<u64>,
}

impl Default for OfflineSettings {
    fn default() -> Self {
        Self {
            noise_amplitude: 1000.0,
            exposure_seconds: 1.5,
            seed: None,
        }
    }
}

/// Timing of a single exposure
#[derive(Debug, Clone, Default)]
pub(crate) struct Exposure {
    started: Option<Instant>,
    duration: Duration,
}

impl Exposure {
    pub(crate) fn new(seconds: f64) -> Self {
        Self {
            started: None,
            duration: Duration::from_secs_f64(seconds.max(0.0)),
        }
    }

    pub(crate) fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    pub(crate) fn cancel(&mut self) {
        self.started = None;
    }

    /// Consume a finished exposure
    pub(crate) fn take_finished(&mut self) -> bool {
        match self.started {
            Some(start) if start.elapsed() >= self.duration => {
                self.started = None;
                true
            }
            _ => false,
        }
    }
}

/// Spectrometer simulator producing a fixed absorption edge with noise
#[derive(Debug)]
pub struct OfflineSpectrometer {
    settings: OfflineSettings,
    rng: StdRng,
    found: usize,
    selected: Option<usize>,
    open: bool,
    exposure: Exposure,
}

impl OfflineSpectrometer {
    /// Create a simulator
    pub fn new(settings: OfflineSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let exposure = Exposure::new(settings.exposure_seconds);
        Self {
            settings,
            rng,
            found: 0,
            selected: None,
            open: false,
            exposure,
        }
    }

    fn noisy_intensities(&mut self) -> Vec<f64> {
        let amplitude = self.settings.noise_amplitude;
        OFFLINE_INTENSITIES
            .iter()
            .map(|&i| i + amplitude * self.rng.gen::<f64>())
            .collect()
    }
}

impl Spectrometer for OfflineSpectrometer {
    fn model_name(&self) -> &str {
        "Test spectrometer"
    }

    fn serial_number(&self) -> &str {
        "007"
    }

    fn search(&mut self) -> Result<usize, DeviceError> {
        self.found = OFFLINE_DEVICES;
        debug!("Offline search found {} devices", self.found);
        Ok(self.found)
    }

    fn select(&mut self, index: usize) -> Result<(), DeviceError> {
        if index >= self.found {
            return Err(DeviceError::InvalidIndex {
                index,
                found: self.found,
            });
        }
        self.selected = Some(index);
        Ok(())
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if self.selected.is_none() {
            return Err(DeviceError::NotSelected);
        }
        self.open = true;
        info!("Opened {} ({})", self.model_name(), self.serial_number());
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
        self.selected.is_none()
    }

    fn exposure_seconds(&self) -> f64 {
        self.settings.exposure_seconds
    }

    fn current_reading(&mut self) -> Result<Option<Reading>, DeviceError> {
        if !self.open {
            return Err(DeviceError::NotOpen);
        }
        if !self.exposure.take_finished() {
            return Ok(None);
        }
        Ok(Some(Reading {
            wavelengths: OFFLINE_WAVELENGTHS.to_vec(),
            intensities: self.noisy_intensities(),
            timestamp: Utc::now(),
        }))
    }
}
