use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod analyze;
mod calibration;
mod check_config;
mod config;
mod simulate;

/// specthermo - Spectrometric thermometer and heater controller
#[derive(Parser)]
#[command(name = "specthermo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Requested verbosity
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Derive temperatures from saved spectra
    Analyze {
        /// Two-column spectra files, analysed in the given order
        #[arg(value_name = "SPECTRUM", required = true)]
        spectra: Vec<PathBuf>,

        /// Calibration table (defaults to the first one in the config)
        #[arg(short = 'c', long, value_name = "FILE")]
        calibration: Option<PathBuf>,

        /// Read the calibration table as polynomial coefficients
        #[arg(long)]
        polynomial: bool,

        /// Configuration file (TOML or key-value lines)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Exposures averaged per temperature (overrides the config)
        #[arg(short = 'a', long)]
        average: Option<usize>,

        /// Export the temperature history to this file
        #[arg(long, value_name = "OUT")]
        history: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the measurement and PID loops on simulated hardware
    Simulate {
        /// How long to run
        #[arg(short = 's', long, default_value = "30")]
        seconds: f64,

        /// Calibration table (defaults to the first one in the config)
        #[arg(short = 'c', long, value_name = "FILE")]
        calibration: Option<PathBuf>,

        /// Read the calibration table as polynomial coefficients
        #[arg(long)]
        polynomial: bool,

        /// Configuration file (TOML or key-value lines)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Replay these spectra instead of the built-in simulator
        #[arg(long, value_name = "SPECTRUM", num_args = 1..)]
        replay: Vec<PathBuf>,

        /// Seconds between exposures (overrides the config)
        #[arg(long)]
        period: Option<f64>,

        /// Regulate with these raw constants, as P,I,D
        #[arg(long, value_name = "P,I,D", value_delimiter = ',')]
        pid: Option<Vec<f64>>,

        /// PID target temperature in °C (overrides the config)
        #[arg(long)]
        set_point: Option<f64>,

        /// Set point ramp in °C per minute (overrides the config)
        #[arg(long)]
        ramp: Option<f64>,

        /// Heater voltage before regulation starts
        #[arg(long, default_value = "0")]
        initial_voltage: f64,

        /// Export the temperature history to this file
        #[arg(long, value_name = "OUT")]
        history: Option<PathBuf>,
    },

    /// Print a calibration curve
    Calibration {
        /// Calibration table
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Read the table as polynomial coefficients
        #[arg(long)]
        polynomial: bool,

        /// First wavelength in nm
        #[arg(long, default_value = "400")]
        from: f64,

        /// Last wavelength in nm
        #[arg(long, default_value = "1200")]
        to: f64,

        /// Wavelength step in nm
        #[arg(long, default_value = "1")]
        step: f64,

        /// Write the curve to this file instead of stdout
        #[arg(short = 'o', long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Check a configuration file and report every entry
    CheckConfig {
        /// Configuration file (TOML or key-value lines)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also print the effective configuration as TOML
        #[arg(long)]
        toml: bool,
    },
}

/// Initialise `env_logger` from the `-v` count
pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Run the selected subcommand
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            spectra,
            calibration,
            polynomial,
            config,
            average,
            history,
            json,
        } => analyze::run(
            spectra,
            calibration,
            polynomial,
            config,
            average,
            history,
            json,
        ),
        Commands::Simulate {
            seconds,
            calibration,
            polynomial,
            config,
            replay,
            period,
            pid,
            set_point,
            ramp,
            initial_voltage,
            history,
        } => simulate::run(simulate::SimulateArgs {
            seconds,
            calibration,
            polynomial,
            config,
            replay,
            period,
            pid,
            set_point,
            ramp,
            initial_voltage,
            history,
        }),
        Commands::Calibration {
            file,
            polynomial,
            from,
            to,
            step,
            output,
        } => calibration::run(file, polynomial, from, to, step, output),
        Commands::CheckConfig { file, toml } => check_config::run(file, toml),
    }
}
