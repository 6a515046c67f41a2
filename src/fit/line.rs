use serde::Serialize;

use super::FitError;

/// Least-squares line fitted over a contiguous index range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitResult {
    /// Value of the line at x = 0
    pub intercept: f64,
    /// Slope of the line
    pub slope: f64,
    /// Coefficient of determination of the fit
    pub r_squared: f64,
    /// First index of the fitted range
    pub start: usize,
    /// Number of points in the fitted range
    pub length: usize,
}

impl FitResult {
    /// Evaluate the fitted line at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Last index of the fitted range (inclusive)
    pub fn end(&self) -> usize {
        self.start + self.length - 1
    }
}

/// Ordinary least-squares line through `(xs, ys)`.
///
/// Returns `(intercept, slope)`. Fails with [`FitError::Degenerate`] for fewer
/// than two points or when all `xs` coincide.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Result<(f64, f64), FitError> {
    if xs.len() != ys.len() {
        return Err(FitError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(FitError::Degenerate(format!(
            "{} point(s), need at least 2",
            xs.len()
        )));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    if sxx == 0.0 || !sxx.is_finite() {
        return Err(FitError::Degenerate("zero variance in x".to_string()));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(FitError::Degenerate("non-finite line parameters".to_string()));
    }
    Ok((intercept, slope))
}

/// Coefficient of determination of `fitted` against `actual`.
///
/// Constant `actual` data (zero total variance, up to rounding) yields `1.0`
/// when the residuals vanish as well and `0.0` otherwise.
pub fn r_squared(fitted: &[f64], actual: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = fitted
        .iter()
        .zip(actual)
        .map(|(f, y)| (y - f).powi(2))
        .sum();

    let scale = actual.iter().map(|y| y * y).sum::<f64>().max(f64::MIN_POSITIVE);
    let tolerance = f64::EPSILON * scale;
    if ss_tot <= tolerance {
        return if ss_res <= tolerance { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

/// Fit a line over `xs[start..=end]`, `ys[start..=end]` and score it.
pub fn fit_range(xs: &[f64], ys: &[f64], start: usize, end: usize) -> Result<FitResult, FitError> {
    let len = xs.len().min(ys.len());
    if start > end || end >= len {
        return Err(FitError::OutOfBounds { start, end, len });
    }

    let x = &xs[start..=end];
    let y = &ys[start..=end];
    let (intercept, slope) = fit_line(x, y)?;
    let fitted: Vec<f64> = x.iter().map(|xi| intercept + slope * xi).collect();

    Ok(FitResult {
        intercept,
        slope,
        r_squared: r_squared(&fitted, y),
        start,
        length: end - start + 1,
    })
}

/// Evaluate a polynomial with ascending-power `coefficients` at `x`.
pub fn polynomial_eval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
