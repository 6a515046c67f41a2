use serde::Serialize;

use crate::fit::{fit_range, FitResult};

use super::EdgeError;

/// Floor for `1 - R²` before taking the logarithm.
///
/// Exact fits would otherwise score `-inf` and stop growth on the spot; with
/// the floor a run of exact points keeps the same (best) score and growth
/// continues across it.
const MIN_UNEXPLAINED_VARIANCE: f64 = 1e-12;

/// Growth direction of an inchworm range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards lower indices
    Left,
    /// Towards higher indices
    Right,
}

/// Inclusive index range `start..=end`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IndexRange {
    /// First index
    pub start: usize,
    /// Last index (inclusive)
    pub end: usize,
}

impl IndexRange {
    /// Range covering the single index `index`
    pub fn point(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// Number of indices in the range
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether the range covers a single index
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// The range extended by one index in `direction`, if it stays inside
    /// `0..len`
    fn extended(&self, direction: Direction, len: usize) -> Option<Self> {
        match direction {
            Direction::Left if self.start > 0 => Some(Self {
                start: self.start - 1,
                end: self.end,
            }),
            Direction::Right if self.end + 1 < len => Some(Self {
                start: self.start,
                end: self.end + 1,
            }),
            _ => None,
        }
    }

    /// Index added by the last extension in `direction`
    fn leading(&self, direction: Direction) -> usize {
        match direction {
            Direction::Left => self.start,
            Direction::Right => self.end,
        }
    }
}

/// Line-growing fitter over one spectrum.
///
/// Fits are done on the intensities as given; the locator passes the
/// boxcar-smoothed ones.
#[derive(Debug, Clone, Copy)]
pub struct Inchworm<'a> {
    wavelengths: &'a [f64],
    intensities: &'a [f64],
    epsilon_limit: f64,
}

impl<'a> Inchworm<'a> {
    /// Create a fitter over `wavelengths`/`intensities` (equal length)
    pub fn new(wavelengths: &'a [f64], intensities: &'a [f64], epsilon_limit: f64) -> Self {
        Self {
            wavelengths,
            intensities,
            epsilon_limit,
        }
    }

    fn len(&self) -> usize {
        self.wavelengths.len().min(self.intensities.len())
    }

    fn check(&self, range: IndexRange) -> Result<(), EdgeError> {
        if range.start > range.end || range.end >= self.len() {
            return Err(EdgeError::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Turn a one-point range into a two-point one: inward at the array ends,
    /// otherwise towards `direction`.
    fn widen(&self, range: IndexRange, direction: Direction) -> IndexRange {
        if !range.is_point() || self.len() < 2 {
            return range;
        }
        if range.start == 0 {
            IndexRange {
                start: 0,
                end: 1,
            }
        } else if range.end == self.len() - 1 {
            IndexRange {
                start: range.start - 1,
                end: range.end,
            }
        } else {
            range.extended(direction, self.len()).unwrap_or(range)
        }
    }

    fn fit(&self, range: IndexRange) -> Result<FitResult, EdgeError> {
        Ok(fit_range(
            self.wavelengths,
            self.intensities,
            range.start,
            range.end,
        )?)
    }

    /// Grow `range` in `direction` by the `ln(1 - R²)` criterion.
    ///
    /// Each step extends the range by one index and refits. Growth continues
    /// while the new score stays below the best score plus `epsilon_limit`;
    /// the best-scoring range (the longer one on ties) is returned together
    /// with its fit.
    pub fn grow(
        &self,
        range: IndexRange,
        direction: Direction,
    ) -> Result<(IndexRange, FitResult), EdgeError> {
        self.check(range)?;
        let start = self.widen(range, direction);

        let mut best = start;
        let mut best_score = f64::INFINITY;
        let mut cursor = start;
        while let Some(next) = cursor.extended(direction, self.len()) {
            cursor = next;
            let fit = self.fit(cursor)?;
            let score = (1.0 - fit.r_squared).max(MIN_UNEXPLAINED_VARIANCE).ln();
            if score <= best_score {
                best_score = score;
                best = cursor;
            }
            if !(score < best_score + self.epsilon_limit) {
                break;
            }
        }

        log::trace!(
            "Inchworm {:?} from {}..={} grew to {}..={} (score {:.3})",
            direction,
            range.start,
            range.end,
            best.start,
            best.end,
            best_score
        );
        Ok((best, self.fit(best)?))
    }

    /// Grow `range` in `direction` by the residual criterion.
    ///
    /// The absolute residual of the first added point, scaled by
    /// `epsilon_limit`, becomes the threshold; growth continues while each
    /// newly added point's residual against the refit line stays below it.
    /// The point failing the test is dropped.
    pub fn grow_by_residual(
        &self,
        range: IndexRange,
        direction: Direction,
    ) -> Result<(IndexRange, FitResult), EdgeError> {
        self.check(range)?;
        let mut kept = self.widen(range, direction);

        let mut threshold: Option<f64> = None;
        while let Some(next) = kept.extended(direction, self.len()) {
            let fit = self.fit(next)?;
            let index = next.leading(direction);
            let residual = (fit.evaluate(self.wavelengths[index]) - self.intensities[index]).abs();
            let limit = *threshold.get_or_insert(residual * self.epsilon_limit);
            if residual < limit {
                kept = next;
            } else {
                break;
            }
        }

        log::trace!(
            "Inchworm_VIT {:?} from {}..={} grew to {}..={}",
            direction,
            range.start,
            range.end,
            kept.start,
            kept.end
        );
        Ok((kept, self.fit(kept)?))
    }

    /// Horizontal line through the intensity at `index`
    pub fn constant(&self, index: usize) -> Result<(IndexRange, FitResult), EdgeError> {
        let range = IndexRange::point(index);
        self.check(range)?;
        Ok((
            range,
            FitResult {
                intercept: self.intensities[index],
                slope: 0.0,
                r_squared: 1.0,
                start: index,
                length: 1,
            },
        ))
    }
}
