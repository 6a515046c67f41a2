//! Temperature time series of one program run.
//!
//! Entries are `(elapsed seconds, temperature)` pairs counted from a time
//! zero. The series is append-only apart from dropping the newest entry (when
//! a spectrum is re-analysed) and a full clear, which also restarts the clock.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data_file::{write_columns, DataFileError};

/// Recorded temperatures and their elapsed times
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureHistory {
    time_zero: DateTime<Utc>,
    times: Vec<f64>,
    temperatures: Vec<f64>,
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureHistory {
    /// Empty history starting now
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Empty history with an explicit time zero
    pub fn starting_at(time_zero: DateTime<Utc>) -> Self {
        Self {
            time_zero,
            times: Vec::new(),
            temperatures: Vec::new(),
        }
    }

    /// Instant from which elapsed seconds are counted
    pub fn time_zero(&self) -> DateTime<Utc> {
        self.time_zero
    }

    /// Seconds between time zero and `time` (negative before time zero)
    pub fn elapsed_seconds(&self, time: DateTime<Utc>) -> f64 {
        let delta = time - self.time_zero;
        match delta.num_microseconds() {
            Some(us) => us as f64 / 1e6,
            None => delta.num_milliseconds() as f64 / 1e3,
        }
    }

    /// Record `temperature` measured at `time`
    pub fn push(&mut self, temperature: f64, time: DateTime<Utc>) {
        let elapsed = self.elapsed_seconds(time);
        self.push_elapsed(elapsed, temperature);
    }

    /// Record `temperature` at `elapsed` seconds after time zero
    pub fn push_elapsed(&mut self, elapsed: f64, temperature: f64) {
        self.times.push(elapsed);
        self.temperatures.push(temperature);
    }

    /// Newest `(elapsed seconds, temperature)` entry
    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.times.last()?, *self.temperatures.last()?))
    }

    /// Drop the newest entry; nothing happens on an empty history
    pub fn remove_last(&mut self) -> Option<(f64, f64)> {
        let time = self.times.pop()?;
        let temperature = self.temperatures.pop()?;
        Some((time, temperature))
    }

    /// Drop every entry and restart the clock now
    pub fn clear(&mut self) {
        self.clear_at(Utc::now());
    }

    /// Drop every entry and restart the clock at `time_zero`
    pub fn clear_at(&mut self, time_zero: DateTime<Utc>) {
        self.times.clear();
        self.temperatures.clear();
        self.time_zero = time_zero;
    }

    /// Elapsed seconds of all entries
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Temperatures of all entries
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the history holds no entries
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Write the history as two columns (seconds, temperature)
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<(), DataFileError> {
        write_columns(path, &self.times, &self.temperatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_elapsed_seconds_from_time_zero() {
        let start = Utc::now();
        let mut history = TemperatureHistory::starting_at(start);
        history.push(21.5, start + Duration::milliseconds(2500));
        history.push(22.0, start + Duration::seconds(5));

        assert_eq!(history.times(), &[2.5, 5.0]);
        assert_eq!(history.temperatures(), &[21.5, 22.0]);
        assert_eq!(history.last(), Some((5.0, 22.0)));
    }

    #[test]
    fn test_remove_last_and_clear() {
        let start = Utc::now();
        let mut history = TemperatureHistory::starting_at(start);
        assert_eq!(history.remove_last(), None);

        history.push_elapsed(1.0, 20.0);
        history.push_elapsed(2.0, 21.0);
        assert_eq!(history.remove_last(), Some((2.0, 21.0)));
        assert_eq!(history.len(), 1);

        let later = start + Duration::seconds(60);
        history.clear_at(later);
        assert!(history.is_empty());
        assert_eq!(history.time_zero(), later);
        assert_eq!(history.last(), None);
    }

    #[test]
    fn test_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temperatures.dat");

        let mut history = TemperatureHistory::starting_at(Utc::now());
        history.push_elapsed(0.0, 25.0);
        history.push_elapsed(10.0, 25.5);
        history.export(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "0    25\n10    25.5\n");
    }
}
