use chrono::{DateTime, Utc};
use log::debug;

use crate::smoothing::{smooth_point_peaks, DEFAULT_MAX_DIFFERENCE};
use crate::spectrum::{AveragedSpectrum, Spectrum, SpectrumError};

use super::AccumulatorError;

/// Running sum of exposures awaiting averaging.
///
/// `loaded <= target` holds between calls: the buffer is flushed and the
/// count reset in the same call that reaches the target.
#[derive(Debug, Clone)]
pub struct SpectrumAccumulator {
    target: usize,
    loaded: usize,
    wavelengths: Vec<f64>,
    intensity_sum: Vec<f64>,
    /// Sum of acquisition times in microseconds since the Unix epoch
    timestamp_sum: i128,
}

impl SpectrumAccumulator {
    /// Create an accumulator averaging `target` exposures
    pub fn new(target: usize) -> Result<Self, AccumulatorError> {
        if target == 0 {
            return Err(AccumulatorError::ZeroTarget);
        }
        Ok(Self {
            target,
            loaded: 0,
            wavelengths: Vec::new(),
            intensity_sum: Vec::new(),
            timestamp_sum: 0,
        })
    }

    /// Number of exposures averaged per result
    pub fn target(&self) -> usize {
        self.target
    }

    /// Exposures folded in since the last flush
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Change the averaging target. Any partial average is abandoned.
    pub fn set_target(&mut self, target: usize) -> Result<(), AccumulatorError> {
        if target == 0 {
            return Err(AccumulatorError::ZeroTarget);
        }
        self.target = target;
        self.clear();
        Ok(())
    }

    /// Abandon the partial average; the next exposure starts a new one
    pub fn clear(&mut self) {
        self.loaded = 0;
    }

    /// Fold one exposure into the buffer.
    ///
    /// The first exposure after a flush (or any exposure with `reset_now`)
    /// replaces the buffer contents, later ones are added elementwise. Returns
    /// the averaged spectrum when this exposure completes the target count.
    pub fn load(
        &mut self,
        wavelengths: &[f64],
        intensities: &[f64],
        timestamp: DateTime<Utc>,
        reset_now: bool,
    ) -> Result<Option<AveragedSpectrum>, AccumulatorError> {
        if reset_now || self.loaded == 0 {
            if wavelengths.len() != intensities.len() {
                return Err(SpectrumError::LengthMismatch {
                    wavelengths: wavelengths.len(),
                    intensities: intensities.len(),
                }
                .into());
            }
            self.wavelengths = wavelengths.to_vec();
            self.intensity_sum = intensities.to_vec();
            self.timestamp_sum = i128::from(timestamp.timestamp_micros());
            self.loaded = 1;
        } else {
            if intensities.len() != self.intensity_sum.len() {
                return Err(AccumulatorError::Length {
                    expected: self.intensity_sum.len(),
                    found: intensities.len(),
                });
            }
            for (sum, value) in self.intensity_sum.iter_mut().zip(intensities) {
                *sum += value;
            }
            self.timestamp_sum += i128::from(timestamp.timestamp_micros());
            self.loaded += 1;
        }

        if self.loaded < self.target {
            return Ok(None);
        }
        self.flush().map(Some)
    }

    fn flush(&mut self) -> Result<AveragedSpectrum, AccumulatorError> {
        let count = self.loaded;
        self.loaded = 0;

        let mut intensities = smooth_point_peaks(&self.intensity_sum, DEFAULT_MAX_DIFFERENCE);
        if count > 1 {
            let divisor = count as f64;
            intensities.iter_mut().for_each(|v| *v /= divisor);
        }

        let mean_micros = i64::try_from(self.timestamp_sum / count as i128)
            .map_err(|_| AccumulatorError::TimestampOutOfRange)?;
        let timestamp = DateTime::<Utc>::from_timestamp_micros(mean_micros)
            .ok_or(AccumulatorError::TimestampOutOfRange)?;

        let spectrum = Spectrum::new(self.wavelengths.clone(), intensities)?;
        debug!(
            "Averaged {} exposure(s) of {} points",
            count,
            spectrum.len()
        );
        Ok(AveragedSpectrum {
            spectrum,
            timestamp,
            spectra_count: count,
        })
    }
}
