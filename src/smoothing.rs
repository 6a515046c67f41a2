//! Boxcar smoothing and single-point spike removal for intensity arrays.
//!
//! Both filters are deterministic and never read outside the input slice:
//! near the boundaries the boxcar window simply shrinks.

/// Default spike threshold used by [`smooth_point_peaks`].
///
/// A cosmic-ray hit in one recorded spectrum differed by ~1400 counts from its
/// neighbours, real features never jump by more than a few counts per pixel.
pub const DEFAULT_MAX_DIFFERENCE: f64 = 20.0;

/// Smooth `input` with a moving average of width `2 * window_half + 1`.
///
/// Sample `i` is averaged over `input[i - left ..= i + right]` where
/// `left = min(window_half, i)` and `right = min(window_half, n - 1 - i)`, so
/// edge samples are averaged over fewer points. `window_half == 0` returns the
/// input unchanged.
pub fn smooth_boxcar(input: &[f64], window_half: usize) -> Vec<f64> {
    if window_half == 0 {
        return input.to_vec();
    }

    let n = input.len();
    let mut output = Vec::with_capacity(n);
    for i in 0..n {
        let left = window_half.min(i);
        let right = window_half.min(n - 1 - i);
        let window = &input[i - left..=i + right];
        output.push(window.iter().sum::<f64>() / window.len() as f64);
    }
    output
}

/// Replace isolated spikes with the mean of their two neighbours.
///
/// Interior samples `1..n-2` are checked (the first sample and the last two are
/// left alone). Neighbour means are always taken from `input`, so a correction
/// never feeds into the check of the next sample.
pub fn smooth_point_peaks(input: &[f64], max_difference: f64) -> Vec<f64> {
    let mut output = input.to_vec();
    if input.len() < 4 {
        return output;
    }

    for i in 1..input.len() - 2 {
        let neighbourhood = (input[i - 1] + input[i + 1]) / 2.0;
        if (input[i] - neighbourhood).abs() > max_difference {
            output[i] = neighbourhood;
        }
    }
    output
}
