use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use log::{error, info, warn};

use crate::analysis::SpectraProcessor;
use crate::device::{Dac, Spectrometer};
use crate::pid::{PidController, PidOutput};

use super::steps::{lock, measurement_step, pid_step, HEATER_CHANNEL, TEMPERATURE_CHANNEL};
use super::RuntimeError;

/// How the PID loop was started
#[derive(Debug, Clone, PartialEq)]
pub enum PidStart {
    /// No temperature yet: the initial voltage was written and the loop was
    /// not started
    VoltageOnly,
    /// The controller regulates; the first output was already applied
    Regulating(PidOutput),
}

/// Handle on a background loop; dropping the stop sender ends it.
struct LoopHandle<T> {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<T>>,
}

impl<T> LoopHandle<T> {
    fn spawn<F>(name: &str, body: F) -> Result<Self, RuntimeError>
    where
        F: FnOnce(Receiver<()>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (stop, stop_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(stop_rx))?;
        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    fn join(mut self, name: &'static str) -> Result<T, RuntimeError> {
        self.stop.take();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| RuntimeError::ThreadPanicked(name)),
            None => Err(RuntimeError::ThreadPanicked(name)),
        }
    }
}

impl<T> Drop for LoopHandle<T> {
    fn drop(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            warn!("Loop dropped without stop(), waiting for thread to finish");
            let _ = handle.join();
        }
    }
}

/// Measurement and PID loops sharing one processor, controller and DAC.
///
/// The measurement loop starts an exposure every period and analyses the
/// finished ones; the PID loop regulates on the latest recorded temperature.
/// Both run on their own threads and can be stopped and restarted; all
/// shared state survives a stop.
pub struct Runtime {
    processor: Arc<Mutex<SpectraProcessor>>,
    pid: Arc<Mutex<PidController>>,
    dac: Arc<Mutex<Box<dyn Dac>>>,
    measurement: Option<LoopHandle<Box<dyn Spectrometer>>>,
    regulation: Option<LoopHandle<()>>,
    pid_events: Option<Sender<PidOutput>>,
}

impl Runtime {
    /// Create an idle runtime
    pub fn new(processor: SpectraProcessor, pid: PidController, dac: Box<dyn Dac>) -> Self {
        Self {
            processor: Arc::new(Mutex::new(processor)),
            pid: Arc::new(Mutex::new(pid)),
            dac: Arc::new(Mutex::new(dac)),
            measurement: None,
            regulation: None,
            pid_events: None,
        }
    }

    /// Publish every applied PID output on `sender`
    pub fn with_pid_events(mut self, sender: Sender<PidOutput>) -> Self {
        self.pid_events = Some(sender);
        self
    }

    /// Shared spectra processor
    pub fn processor(&self) -> Arc<Mutex<SpectraProcessor>> {
        Arc::clone(&self.processor)
    }

    /// Shared PID controller
    pub fn pid(&self) -> Arc<Mutex<PidController>> {
        Arc::clone(&self.pid)
    }

    /// Shared DAC
    pub fn dac(&self) -> Arc<Mutex<Box<dyn Dac>>> {
        Arc::clone(&self.dac)
    }

    /// Whether the measurement loop runs
    pub fn is_measuring(&self) -> bool {
        self.measurement.is_some()
    }

    /// Whether the PID loop runs
    pub fn is_regulating(&self) -> bool {
        self.regulation.is_some()
    }

    /// Start exposing every `period`.
    ///
    /// The spectrometer must be open. A new session starts: the history time
    /// zero is now and the edge search memory is cleared. The first exposure
    /// starts right away.
    pub fn start_measurement(
        &mut self,
        mut spectrometer: Box<dyn Spectrometer>,
        period: Duration,
    ) -> Result<(), RuntimeError> {
        if self.measurement.is_some() {
            return Err(RuntimeError::AlreadyRunning("Measurement"));
        }
        lock(&self.processor, "processor")?.start_session();
        spectrometer.start_exposure()?;
        info!(
            "Measuring with {} every {:?}",
            spectrometer.model_name(),
            period
        );

        let processor = Arc::clone(&self.processor);
        let handle = LoopHandle::spawn("specthermo-measure", move |stop| {
            let ticker = tick(period);
            loop {
                select! {
                    recv(ticker) -> _ => {
                        match measurement_step(spectrometer.as_mut(), &processor, false) {
                            Ok(_) => {}
                            Err(RuntimeError::SpectrometerRemoved) => warn!("Device removed!"),
                            Err(RuntimeError::Analysis(e)) => warn!("{}", e),
                            Err(e) => error!("Measurement failed: {}", e),
                        }
                    }
                    recv(stop) -> _ => break,
                }
            }
            spectrometer.cancel_exposure();
            spectrometer
        })?;
        self.measurement = Some(handle);
        Ok(())
    }

    /// Stop the measurement loop and hand back the spectrometer
    pub fn stop_measurement(&mut self) -> Result<Option<Box<dyn Spectrometer>>, RuntimeError> {
        match self.measurement.take() {
            Some(handle) => {
                let spectrometer = handle.join("Measurement")?;
                info!("Measurement stopped");
                Ok(Some(spectrometer))
            }
            None => Ok(None),
        }
    }

    /// Start regulating every `period`.
    ///
    /// Without any recorded temperature only the heater is set to
    /// `initial_voltage`. Otherwise the controller starts from the latest
    /// temperature, one tick is applied immediately and the loop is spawned.
    pub fn start_pid(
        &mut self,
        initial_voltage: f64,
        period: Duration,
    ) -> Result<PidStart, RuntimeError> {
        if self.regulation.is_some() {
            return Err(RuntimeError::AlreadyRunning("PID"));
        }
        if !(initial_voltage >= 0.0) || !initial_voltage.is_finite() {
            return Err(RuntimeError::InvalidVoltage(initial_voltage));
        }

        let last = lock(&self.processor, "processor")?.history().last();
        let Some((_, temperature)) = last else {
            warn!("No initial temperature! Setting DAC voltage only.");
            let mut dac = lock(&self.dac, "DAC")?;
            dac.set_voltage(TEMPERATURE_CHANNEL, 0.0, false)?;
            dac.set_voltage(HEATER_CHANNEL, initial_voltage, true)?;
            return Ok(PidStart::VoltageOnly);
        };

        {
            let mut pid = lock(&self.pid, "PID")?;
            pid.set_period(period.as_secs_f64())?;
            pid.reset(temperature);
        }
        let first = self.pid_tick()?;

        let processor = Arc::clone(&self.processor);
        let pid = Arc::clone(&self.pid);
        let dac = Arc::clone(&self.dac);
        let events = self.pid_events.clone();
        let handle = LoopHandle::spawn("specthermo-pid", move |stop| {
            let ticker = tick(period);
            let mut events = events;
            loop {
                select! {
                    recv(ticker) -> _ => {
                        match run_pid_step(&processor, &pid, &dac) {
                            Ok(Some(output)) => publish(&mut events, output),
                            Ok(None) => {}
                            Err(e) => error!("PID tick failed: {}", e),
                        }
                    }
                    recv(stop) -> _ => break,
                }
            }
        })?;
        self.regulation = Some(handle);

        Ok(PidStart::Regulating(first.unwrap_or_else(|| PidOutput {
            voltage: initial_voltage,
            status: String::new(),
        })))
    }

    /// Stop regulating; the heater keeps its last voltage
    pub fn stop_pid(&mut self) -> Result<(), RuntimeError> {
        if let Some(handle) = self.regulation.take() {
            handle.join("PID")?;
        }
        lock(&self.pid, "PID")?.stop();
        Ok(())
    }

    /// Stop both loops
    pub fn stop(&mut self) -> Result<Option<Box<dyn Spectrometer>>, RuntimeError> {
        self.stop_pid()?;
        self.stop_measurement()
    }

    fn pid_tick(&mut self) -> Result<Option<PidOutput>, RuntimeError> {
        let output = run_pid_step(&self.processor, &self.pid, &self.dac)?;
        if let Some(output) = &output {
            publish(&mut self.pid_events, output.clone());
        }
        Ok(output)
    }
}

fn run_pid_step(
    processor: &Mutex<SpectraProcessor>,
    pid: &Mutex<PidController>,
    dac: &Mutex<Box<dyn Dac>>,
) -> Result<Option<PidOutput>, RuntimeError> {
    let mut dac = lock(dac, "DAC")?;
    pid_step(processor, pid, dac.as_mut())
}

fn publish(events: &mut Option<Sender<PidOutput>>, output: PidOutput) {
    if let Some(sender) = events {
        if sender.send(output).is_err() {
            warn!("PID event receiver gone, no longer publishing");
            *events = None;
        }
    }
}
