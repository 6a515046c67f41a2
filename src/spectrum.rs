//! Spectrum data structures shared by the accumulator, the edge locator and
//! the device collaborators.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Errors raised when building a spectrum
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    /// Wavelength and intensity arrays differ in length
    #[error("Spectrum length mismatch: {wavelengths} wavelengths, {intensities} intensities")]
    LengthMismatch {
        /// Number of wavelengths
        wavelengths: usize,
        /// Number of intensities
        intensities: usize,
    },

    /// Wavelengths are not strictly increasing
    #[error("Wavelengths not strictly increasing at index {0}")]
    NotIncreasing(usize),
}

/// One spectrum: wavelengths (strictly increasing) and their intensities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    wavelengths: Vec<f64>,
    intensities: Vec<f64>,
}

impl Spectrum {
    /// Create a spectrum, checking that both arrays have the same length and
    /// that the wavelengths increase.
    pub fn new(wavelengths: Vec<f64>, intensities: Vec<f64>) -> Result<Self, SpectrumError> {
        if wavelengths.len() != intensities.len() {
            return Err(SpectrumError::LengthMismatch {
                wavelengths: wavelengths.len(),
                intensities: intensities.len(),
            });
        }
        if let Some(i) = (1..wavelengths.len()).find(|&i| !(wavelengths[i] > wavelengths[i - 1])) {
            return Err(SpectrumError::NotIncreasing(i));
        }
        Ok(Self {
            wavelengths,
            intensities,
        })
    }

    /// Wavelength axis
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// Intensity values
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Whether the spectrum has no samples
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Index of the sample whose wavelength is closest to `wavelength`.
    ///
    /// Returns `None` for an empty spectrum.
    pub fn nearest_index(&self, wavelength: f64) -> Option<usize> {
        self.wavelengths
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - wavelength)
                    .abs()
                    .total_cmp(&(*b - wavelength).abs())
            })
            .map(|(i, _)| i)
    }

    /// Largest intensity and its index (first one on ties)
    pub fn intensity_max(&self) -> Option<(usize, f64)> {
        intensity_max(&self.intensities)
    }
}

pub(crate) fn intensity_max(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if v <= b => best,
            _ if v.is_nan() => best,
            _ => Some((i, v)),
        })
}

/// Spectrum produced by averaging several exposures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragedSpectrum {
    /// Averaged (and despiked) spectrum
    pub spectrum: Spectrum,
    /// Mean acquisition time of the folded exposures
    pub timestamp: DateTime<Utc>,
    /// Number of exposures folded in
    pub spectra_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_rejects_mismatch() {
        assert_eq!(
            Spectrum::new(vec![1.0, 2.0], vec![1.0]),
            Err(SpectrumError::LengthMismatch {
                wavelengths: 2,
                intensities: 1
            })
        );
        assert_eq!(
            Spectrum::new(vec![1.0, 1.0], vec![1.0, 2.0]),
            Err(SpectrumError::NotIncreasing(1))
        );
    }

    #[test]
    fn test_nearest_index_and_max() {
        let spectrum = Spectrum::new(vec![400.0, 410.0, 420.0], vec![5.0, 9.0, 9.0]).unwrap();
        assert_eq!(spectrum.nearest_index(413.0), Some(1));
        assert_eq!(spectrum.nearest_index(1000.0), Some(2));
        assert_eq!(spectrum.intensity_max(), Some((1, 9.0)));
    }
}
