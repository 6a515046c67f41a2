use anyhow::{Context, Result};
use crossbeam_channel::{after, select, unbounded};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

use specthermo::analysis::{AnalysisEvent, SpectraProcessor};
use specthermo::device::{self, create_dac, create_spectrometer, OfflineDac, ReplaySettings, SpectrometerKind};
use specthermo::pid::PidController;
use specthermo::runtime::{PidStart, Runtime};

use super::config;

/// Command-line options of `simulate`
pub struct SimulateArgs {
    pub seconds: f64,
    pub calibration: Option<PathBuf>,
    pub polynomial: bool,
    pub config: Option<PathBuf>,
    pub replay: Vec<PathBuf>,
    pub period: Option<f64>,
    pub pid: Option<Vec<f64>>,
    pub set_point: Option<f64>,
    pub ramp: Option<f64>,
    pub initial_voltage: f64,
    pub history: Option<PathBuf>,
}

/// Run the measurement loop, and optionally the PID loop, for a while
pub fn run(args: SimulateArgs) -> Result<()> {
    if !(args.seconds > 0.0) || !args.seconds.is_finite() {
        anyhow::bail!("Duration must be positive, got {}", args.seconds);
    }

    let (mut settings, mut report) = config::load(args.config.as_deref())?;
    if let Some(period) = args.period {
        settings.measurement.period = period;
    }
    if !args.replay.is_empty() {
        settings.device.spectrometer = SpectrometerKind::Replay(ReplaySettings {
            files: args.replay.clone(),
            repeat: false,
            exposure_seconds: 0.0,
        });
    }
    let regulate = match &args.pid {
        Some(gains) if gains.len() == 3 => {
            settings.pid.p = gains[0];
            settings.pid.i = gains[1];
            settings.pid.d = gains[2];
            true
        }
        Some(gains) => anyhow::bail!("--pid takes P,I,D, got {} values", gains.len()),
        None => false,
    };
    if let Some(set_point) = args.set_point {
        settings.pid.set_point = set_point;
    }
    if let Some(ramp) = args.ramp {
        settings.pid.ramp = ramp;
    }
    settings.validate().context("Invalid settings")?;

    let calibration = config::select_calibration(
        args.calibration.as_deref(),
        args.polynomial,
        &settings,
        args.config.as_deref(),
        &mut report,
    )?;

    let mut spectrometer =
        create_spectrometer(&settings.device.spectrometer).context("Failed to create spectrometer")?;
    device::connect(spectrometer.as_mut()).context("Failed to open spectrometer")?;
    let dac = match create_dac(settings.device.dac) {
        Ok(dac) => dac,
        Err(e) => {
            warn!("{}, using offline DAC", e);
            Box::new(OfflineDac::new())
        }
    };

    let (analysis_tx, analysis_rx) = unbounded();
    let (pid_tx, pid_rx) = unbounded();
    let mut processor =
        SpectraProcessor::new(settings.edge.clone(), settings.measurement.average)?
            .with_events(analysis_tx);
    processor.set_calibration(Some(calibration));

    let mut pid = PidController::new(settings.pid.buffer_length, settings.pid.period)?;
    pid.apply(settings.pid.parameters()?);

    info!("specthermo - Simulation");
    info!("=======================");
    info!("Spectrometer: {}", spectrometer.model_name());
    info!("Period: {} s, average {}", settings.measurement.period, settings.measurement.average);
    if regulate {
        info!(
            "PID: P={} I={} D={} -> {} °C",
            settings.pid.p, settings.pid.i, settings.pid.d, settings.pid.set_point
        );
    }

    let mut runtime = Runtime::new(processor, pid, dac).with_pid_events(pid_tx);
    runtime.start_measurement(
        spectrometer,
        Duration::from_secs_f64(settings.measurement.period),
    )?;

    println!("{:>10} {:>12} {:>10} {:>10}", "time (s)", "edge (nm)", "T (°C)", "heater (V)");
    let deadline = after(Duration::from_secs_f64(args.seconds));
    let mut heater = args.initial_voltage;
    loop {
        select! {
            recv(analysis_rx) -> event => match event {
                Ok(AnalysisEvent::Analyzed(analysis)) => {
                    println!(
                        "{:>10.1} {:>12.3} {:>10.2} {:>10.3}",
                        analysis.elapsed, analysis.edge_wavelength, analysis.temperature, heater
                    );
                    if regulate && !runtime.is_regulating() {
                        let period = Duration::from_secs_f64(settings.pid.period);
                        if let PidStart::Regulating(output) =
                            runtime.start_pid(args.initial_voltage, period)?
                        {
                            heater = output.voltage;
                        }
                    }
                }
                Ok(AnalysisEvent::EdgeNotFound { timestamp, reason }) => {
                    warn!("{}: {}", timestamp, reason);
                }
                Err(_) => break,
            },
            recv(pid_rx) -> output => {
                if let Ok(output) = output {
                    heater = output.voltage;
                    info!("{} -> {:.3} V", output.status, output.voltage);
                }
            },
            recv(deadline) -> _ => break,
        }
    }

    let spectrometer = runtime.stop()?;
    if let Some(mut spectrometer) = spectrometer {
        spectrometer.close();
    }

    let processor = runtime.processor();
    let processor = processor
        .lock()
        .map_err(|_| anyhow::anyhow!("Processor state poisoned"))?;
    let history = processor.history();
    info!("Recorded {} temperatures", history.len());
    if let Some(out) = args.history {
        history
            .export(&out)
            .with_context(|| format!("Failed to export history: {}", out.display()))?;
        info!("History written to {}", out.display());
    }
    Ok(())
}
