use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use log::{debug, info, warn};

use crate::accumulator::SpectrumAccumulator;
use crate::calibration::Calibration;
use crate::edge::{EdgeLocator, EdgeParameters, EdgeSearchState};
use crate::history::TemperatureHistory;
use crate::spectrum::AveragedSpectrum;

use super::{Analysis, AnalysisError, AnalysisEvent};

/// Accumulates exposures and turns averaged spectra into temperatures
#[derive(Debug)]
pub struct SpectraProcessor {
    accumulator: SpectrumAccumulator,
    locator: EdgeLocator,
    search: EdgeSearchState,
    calibration: Option<Arc<Calibration>>,
    history: TemperatureHistory,
    /// Last averaged spectrum, kept for re-analysis
    current: Option<AveragedSpectrum>,
    /// Whether the analysis of `current` appended a history entry
    recorded: bool,
    last_analysis: Option<Analysis>,
    events: Option<Sender<AnalysisEvent>>,
}

impl SpectraProcessor {
    /// Create a processor averaging `average` exposures per analysis
    pub fn new(params: EdgeParameters, average: usize) -> Result<Self, AnalysisError> {
        Ok(Self {
            accumulator: SpectrumAccumulator::new(average)?,
            locator: EdgeLocator::new(params),
            search: EdgeSearchState::default(),
            calibration: None,
            history: TemperatureHistory::new(),
            current: None,
            recorded: false,
            last_analysis: None,
            events: None,
        })
    }

    /// Publish every analysis outcome on `sender`
    pub fn with_events(mut self, sender: Sender<AnalysisEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Use a fresh history with the given time zero
    pub fn with_history(mut self, history: TemperatureHistory) -> Self {
        self.history = history;
        self
    }

    /// Select the calibration used for new analyses
    pub fn set_calibration(&mut self, calibration: Option<Arc<Calibration>>) {
        self.calibration = calibration;
    }

    /// Selected calibration
    pub fn calibration(&self) -> Option<&Arc<Calibration>> {
        self.calibration.as_ref()
    }

    /// Replace the edge search constants
    pub fn set_parameters(&mut self, params: EdgeParameters) {
        self.locator = EdgeLocator::new(params);
    }

    /// Edge search constants in use
    pub fn parameters(&self) -> &EdgeParameters {
        self.locator.parameters()
    }

    /// Change how many exposures are averaged; drops any partial average
    pub fn set_average(&mut self, average: usize) -> Result<(), AnalysisError> {
        Ok(self.accumulator.set_target(average)?)
    }

    /// Forget the derivative maximum of the previous spectrum
    pub fn reset_search(&mut self) {
        self.search.reset();
    }

    /// Start a new measurement session: clears the partial average and the
    /// search memory. An empty history restarts its clock now.
    pub fn start_session(&mut self) {
        self.accumulator.clear();
        self.search.reset();
        if self.history.is_empty() {
            self.history.clear_at(Utc::now());
        }
        info!(
            "Measurement session started (averaging {})",
            self.accumulator.target()
        );
    }

    /// Edge search memory
    pub fn search_state(&self) -> EdgeSearchState {
        self.search
    }

    /// Recorded temperatures
    pub fn history(&self) -> &TemperatureHistory {
        &self.history
    }

    /// Recorded temperatures, mutable (clear, export)
    pub fn history_mut(&mut self) -> &mut TemperatureHistory {
        &mut self.history
    }

    /// Last averaged spectrum
    pub fn current_spectrum(&self) -> Option<&AveragedSpectrum> {
        self.current.as_ref()
    }

    /// Result of the last successful analysis
    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last_analysis.as_ref()
    }

    /// Fold one exposure in; analyse once the average is complete.
    ///
    /// Returns `Ok(None)` while the average is still filling.
    pub fn load(
        &mut self,
        wavelengths: &[f64],
        intensities: &[f64],
        timestamp: DateTime<Utc>,
        reset_now: bool,
    ) -> Result<Option<Analysis>, AnalysisError> {
        match self
            .accumulator
            .load(wavelengths, intensities, timestamp, reset_now)?
        {
            Some(averaged) => self.analyze(averaged).map(Some),
            None => Ok(None),
        }
    }

    /// Analyse an averaged spectrum and record its temperature.
    pub fn analyze(&mut self, averaged: AveragedSpectrum) -> Result<Analysis, AnalysisError> {
        self.current = Some(averaged);
        self.recorded = false;
        self.analyze_current()
    }

    /// Analyse the last spectrum again with a full search, replacing its
    /// history entry.
    pub fn reanalyze(&mut self) -> Result<Analysis, AnalysisError> {
        self.search.reset();
        self.retract_current()?;
        self.analyze_current()
    }

    /// Analyse the last spectrum again, searching the derivative maximum
    /// around the sample nearest to `wavelength`. The previous history entry
    /// of that spectrum is replaced.
    pub fn reanalyze_at(&mut self, wavelength: f64) -> Result<Analysis, AnalysisError> {
        let index = self
            .current
            .as_ref()
            .and_then(|c| c.spectrum.nearest_index(wavelength))
            .ok_or(AnalysisError::NoSpectrum)?;
        debug!("Re-analysing around {} (index {})", wavelength, index);
        self.search.set(index);
        self.retract_current()?;
        self.analyze_current()
    }

    fn retract_current(&mut self) -> Result<(), AnalysisError> {
        if self.current.is_none() {
            return Err(AnalysisError::NoSpectrum);
        }
        if self.recorded {
            self.history.remove_last();
            self.recorded = false;
        }
        Ok(())
    }

    fn analyze_current(&mut self) -> Result<Analysis, AnalysisError> {
        let calibration = self
            .calibration
            .clone()
            .ok_or(AnalysisError::CalibrationMissing)?;
        let averaged = self.current.as_ref().ok_or(AnalysisError::NoSpectrum)?;

        let edge = match self.locator.locate(&averaged.spectrum, &mut self.search) {
            Ok(edge) => edge,
            Err(e) => {
                let event = AnalysisEvent::EdgeNotFound {
                    timestamp: averaged.timestamp,
                    reason: e.to_string(),
                };
                self.publish(event);
                return Err(e.into());
            }
        };

        let temperature = calibration.temperature(edge.wavelength);
        self.history.push(temperature, averaged.timestamp);
        self.recorded = true;

        let analysis = Analysis {
            timestamp: averaged.timestamp,
            elapsed: self.history.elapsed_seconds(averaged.timestamp),
            spectra_count: averaged.spectra_count,
            edge_wavelength: edge.wavelength,
            temperature,
            edge,
        };
        info!(
            "T = {:.1} °C (edge {:.3} nm, t = {:.1} s)",
            analysis.temperature, analysis.edge_wavelength, analysis.elapsed
        );

        self.last_analysis = Some(analysis.clone());
        self.publish(AnalysisEvent::Analyzed(analysis.clone()));
        Ok(analysis)
    }

    fn publish(&mut self, event: AnalysisEvent) {
        if let Some(sender) = &self.events {
            if sender.send(event).is_err() {
                warn!("Analysis event receiver dropped, unsubscribing");
                self.events = None;
            }
        }
    }
}
