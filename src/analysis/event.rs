use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::edge::EdgeFit;

/// Outcome of analysing one averaged spectrum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Mean acquisition time of the averaged exposures
    pub timestamp: DateTime<Utc>,
    /// Seconds since the history time zero
    pub elapsed: f64,
    /// Number of exposures averaged
    pub spectra_count: usize,
    /// Absorption edge wavelength
    pub edge_wavelength: f64,
    /// Calibrated sample temperature
    pub temperature: f64,
    /// Edge fit details, including the plotting artifact
    pub edge: EdgeFit,
}

/// Notification published after every analysis attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AnalysisEvent {
    /// A temperature was derived and recorded
    Analyzed(Analysis),
    /// The edge search failed; nothing was recorded
    EdgeNotFound {
        /// Mean acquisition time of the spectrum
        timestamp: DateTime<Utc>,
        /// Failure description
        reason: String,
    },
}
