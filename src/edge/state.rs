use serde::Serialize;

/// Memory of the last derivative maximum between consecutive analyses.
///
/// Unknown means the next search covers the whole spectrum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EdgeSearchState {
    peak_index: Option<usize>,
}

impl EdgeSearchState {
    /// State pinned to a known peak index
    pub fn at(index: usize) -> Self {
        Self {
            peak_index: Some(index),
        }
    }

    /// Last derivative maximum, if known
    pub fn peak_index(&self) -> Option<usize> {
        self.peak_index
    }

    /// Remember a new derivative maximum
    pub fn set(&mut self, index: usize) {
        self.peak_index = Some(index);
    }

    /// Forget the maximum; the next search covers the whole spectrum
    pub fn reset(&mut self) {
        self.peak_index = None;
    }

    /// Inclusive index window to search in a spectrum of `len` points.
    ///
    /// `len` must be non-zero.
    pub fn search_window(&self, len: usize, half_width: usize) -> (usize, usize) {
        match self.peak_index {
            None => (0, len - 1),
            Some(index) => {
                let index = index.min(len - 1);
                (
                    index.saturating_sub(half_width),
                    index.saturating_add(half_width).min(len - 1),
                )
            }
        }
    }
}
