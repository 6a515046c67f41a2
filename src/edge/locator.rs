use log::{debug, warn};
use serde::Serialize;

use crate::fit::{CubicSpline, FitError, FitResult};
use crate::smoothing::smooth_boxcar;
use crate::spectrum::Spectrum;

use super::{
    Direction, EdgeError, EdgeMethod, EdgeParameters, EdgeSearchState, FitGraphics, IndexRange,
    Inchworm,
};

/// Result of a successful edge search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeFit {
    /// Absorption edge wavelength (intersection of both lines)
    pub wavelength: f64,
    /// Index of the smoothed derivative maximum
    pub peak_index: usize,
    /// Line fitted to the edge slope
    pub edge_line: FitResult,
    /// Line fitted to the pre-edge baseline
    pub baseline_line: FitResult,
    /// Plotting artifact
    pub graphics: FitGraphics,
}

/// Locates the absorption edge of spectra with fixed [`EdgeParameters`].
///
/// The locator itself is stateless; the derivative-maximum memory lives in
/// the [`EdgeSearchState`] passed to [`locate`](Self::locate).
#[derive(Debug, Clone, Default)]
pub struct EdgeLocator {
    params: EdgeParameters,
}

impl EdgeLocator {
    /// Create a locator
    pub fn new(params: EdgeParameters) -> Self {
        Self { params }
    }

    /// Parameters in use
    pub fn parameters(&self) -> &EdgeParameters {
        &self.params
    }

    /// Intensities of `spectrum` after the boxcar every fit works on
    pub fn smoothed_intensities(&self, spectrum: &Spectrum) -> Vec<f64> {
        smooth_boxcar(spectrum.intensities(), self.params.smoothing_intensities)
    }

    /// Smoothed first derivative of the smoothed intensities at every sample.
    pub fn derivative(&self, spectrum: &Spectrum) -> Result<Vec<f64>, FitError> {
        let smoothed = self.smoothed_intensities(spectrum);
        self.derivative_of(spectrum.wavelengths(), &smoothed)
    }

    fn derivative_of(&self, wavelengths: &[f64], smoothed: &[f64]) -> Result<Vec<f64>, FitError> {
        let spline = CubicSpline::new(wavelengths, smoothed)?;
        let derivative: Vec<f64> = wavelengths
            .iter()
            .map(|&w| spline.differentiate(w))
            .collect();
        Ok(smooth_boxcar(&derivative, self.params.smoothing_derivatives))
    }

    /// Find the absorption edge of `spectrum`.
    ///
    /// On success `state` holds the new derivative maximum. On any failure it
    /// is reset so that the next call searches the whole spectrum again.
    pub fn locate(
        &self,
        spectrum: &Spectrum,
        state: &mut EdgeSearchState,
    ) -> Result<EdgeFit, EdgeError> {
        let result = self.locate_inner(spectrum, state);
        if let Err(e) = &result {
            warn!("Absorption edge search failed: {}", e);
            state.reset();
        }
        result
    }

    fn locate_inner(
        &self,
        spectrum: &Spectrum,
        state: &mut EdgeSearchState,
    ) -> Result<EdgeFit, EdgeError> {
        let smoothed = self.smoothed_intensities(spectrum);
        let derivative = self.derivative_of(spectrum.wavelengths(), &smoothed)?;

        let (from, to) = state.search_window(spectrum.len(), self.params.search_half_width);
        let peak_index = argmax(&derivative[from..=to]) + from;
        state.set(peak_index);
        debug!(
            "Derivative maximum at index {} (searched {}..={})",
            peak_index, from, to
        );

        let inchworm = Inchworm::new(spectrum.wavelengths(), &smoothed, self.params.epsilon_limit);

        let (grown, _) = inchworm.grow(IndexRange::point(peak_index), Direction::Left)?;
        let (edge_range, edge_line) = inchworm.grow(grown, Direction::Right)?;

        let seed = self.slide(&derivative, edge_range.start);
        debug!(
            "Edge line over {}..={}, baseline seed at index {}",
            edge_range.start, edge_range.end, seed
        );

        let baseline_line = match self.params.method {
            EdgeMethod::Inchworm => {
                let (grown, _) = inchworm.grow(IndexRange::point(seed), Direction::Right)?;
                inchworm.grow(grown, Direction::Left)?.1
            }
            EdgeMethod::InchwormVit => {
                let (grown, _) =
                    inchworm.grow_by_residual(IndexRange::point(seed), Direction::Right)?;
                inchworm.grow_by_residual(grown, Direction::Left)?.1
            }
            EdgeMethod::Constant => inchworm.constant(seed)?.1,
        };

        let wavelength = (baseline_line.intercept - edge_line.intercept)
            / (edge_line.slope - baseline_line.slope);
        if !wavelength.is_finite() {
            return Err(EdgeError::NotFound(format!(
                "lines do not intersect (edge slope {}, baseline slope {})",
                edge_line.slope, baseline_line.slope
            )));
        }

        let graphics = FitGraphics::new(
            spectrum.wavelengths(),
            &smoothed,
            &baseline_line,
            &edge_line,
            wavelength,
        );
        debug!("Absorption edge at {:.3}", wavelength);

        Ok(EdgeFit {
            wavelength,
            peak_index,
            edge_line,
            baseline_line,
            graphics,
        })
    }

    /// Walk left from the edge line while the derivative stays on a
    /// non-negative plateau or keeps falling.
    fn slide(&self, derivative: &[f64], edge_start: usize) -> usize {
        let mut slider = edge_start.saturating_sub(self.params.points_to_skip);
        let mut minimum = derivative[slider];
        while slider > 0
            && derivative[slider] <= minimum + self.params.slider_limit
            && derivative[slider] >= 0.0
        {
            if derivative[slider] <= minimum {
                minimum = derivative[slider];
            }
            slider -= 1;
        }
        slider
    }
}

/// Index of the first maximum; NaN values are never selected.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] || values[best].is_nan() {
            best = i;
        }
    }
    best
}
