use serde::Serialize;

use crate::fit::FitResult;
use crate::spectrum::{intensity_max, Spectrum};

use super::IndexRange;

/// A point in (wavelength, intensity) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Wavelength
    pub x: f64,
    /// Intensity
    pub y: f64,
}

/// Straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineSegment {
    /// Left end
    pub from: Point,
    /// Right end
    pub to: Point,
}

/// Plotting artifact of one edge search: both fitted lines clipped to the
/// data, their intersection and the index ranges that were fitted.
///
/// Nothing here feeds back into the analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitGraphics {
    /// Baseline line from the first wavelength to the wavelength of the
    /// intensity maximum
    pub baseline_line: LineSegment,
    /// Edge line from its zero crossing up to the intensity maximum
    pub edge_line: LineSegment,
    /// Intersection of both lines (the absorption edge)
    pub intersection: Point,
    /// Indices used for the baseline fit
    pub baseline_range: IndexRange,
    /// Indices used for the edge fit
    pub edge_range: IndexRange,
}

impl FitGraphics {
    /// `intensities` are the smoothed ones the lines were fitted to.
    pub(crate) fn new(
        wavelengths: &[f64],
        intensities: &[f64],
        baseline: &FitResult,
        edge: &FitResult,
        edge_wavelength: f64,
    ) -> Self {
        let first = wavelengths.first().copied().unwrap_or(0.0);
        let last = wavelengths.last().copied().unwrap_or(first);
        let (max_index, max_intensity) = intensity_max(intensities).unwrap_or((0, 0.0));
        let max_wavelength = wavelengths.get(max_index).copied().unwrap_or(first);

        let baseline_line = LineSegment {
            from: Point {
                x: first,
                y: baseline.evaluate(first),
            },
            to: Point {
                x: max_wavelength,
                y: baseline.evaluate(max_wavelength),
            },
        };

        let edge_line = if edge.slope != 0.0 {
            LineSegment {
                from: Point {
                    x: -edge.intercept / edge.slope,
                    y: 0.0,
                },
                to: Point {
                    x: (max_intensity - edge.intercept) / edge.slope,
                    y: max_intensity,
                },
            }
        } else {
            LineSegment {
                from: Point {
                    x: first,
                    y: edge.intercept,
                },
                to: Point {
                    x: last,
                    y: edge.intercept,
                },
            }
        };

        Self {
            baseline_line,
            edge_line,
            intersection: Point {
                x: edge_wavelength,
                y: edge.evaluate(edge_wavelength),
            },
            baseline_range: IndexRange {
                start: baseline.start,
                end: baseline.end(),
            },
            edge_range: IndexRange {
                start: edge.start,
                end: edge.end(),
            },
        }
    }

    /// Samples of `spectrum` inside the baseline fit range
    pub fn marked_baseline(&self, spectrum: &Spectrum) -> (Vec<f64>, Vec<f64>) {
        marked(spectrum, self.baseline_range)
    }

    /// Samples of `spectrum` inside the edge fit range
    pub fn marked_edge(&self, spectrum: &Spectrum) -> (Vec<f64>, Vec<f64>) {
        marked(spectrum, self.edge_range)
    }
}

fn marked(spectrum: &Spectrum, range: IndexRange) -> (Vec<f64>, Vec<f64>) {
    let end = range.end.min(spectrum.len().saturating_sub(1));
    if spectrum.is_empty() || range.start > end {
        return (Vec::new(), Vec::new());
    }
    (
        spectrum.wavelengths()[range.start..=end].to_vec(),
        spectrum.intensities()[range.start..=end].to_vec(),
    )
}
