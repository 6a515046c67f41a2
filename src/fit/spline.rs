use super::FitError;

/// Natural cubic spline interpolant.
///
/// Piecewise cubic with continuous first and second derivatives and zero
/// second derivative at both ends. Outside the knot range the boundary
/// polynomial is extrapolated.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots
    y2s: Vec<f64>,
}

impl CubicSpline {
    /// Build a natural spline through `(xs, ys)`.
    ///
    /// `xs` must be strictly increasing and hold at least two knots.
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(FitError::Degenerate(format!(
                "spline needs at least 2 knots, got {}",
                xs.len()
            )));
        }
        if let Some(i) = (1..xs.len()).find(|&i| !(xs[i] > xs[i - 1])) {
            return Err(FitError::Degenerate(format!(
                "spline knots not strictly increasing at index {}",
                i
            )));
        }

        let n = xs.len();
        let mut y2s = vec![0.0; n];
        let mut u = vec![0.0; n - 1];

        // Tridiagonal forward sweep
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2s[i - 1] + 2.0;
            y2s[i] = (sig - 1.0) / p;
            u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }

        for k in (0..n - 2).rev() {
            y2s[k + 1] = y2s[k + 1] * y2s[k + 2] + u[k + 1];
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            y2s,
        })
    }

    /// Value of the spline at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        let (lo, hi) = self.interval(x);
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2s[lo] + (b * b * b - b) * self.y2s[hi]) * h * h / 6.0
    }

    /// First derivative of the spline at `x`
    pub fn differentiate(&self, x: f64) -> f64 {
        let (lo, hi) = self.interval(x);
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        (self.ys[hi] - self.ys[lo]) / h
            - (3.0 * a * a - 1.0) / 6.0 * h * self.y2s[lo]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2s[hi]
    }

    /// Knot positions
    pub fn knots(&self) -> &[f64] {
        &self.xs
    }

    // Binary search for the enclosing knot interval
    fn interval(&self, x: f64) -> (usize, usize) {
        let mut lo = 0;
        let mut hi = self.xs.len() - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        (lo, hi)
    }
}
