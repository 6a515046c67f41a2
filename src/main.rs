//! # specthermo
//!
//! Command-line front end of the spectrometric thermometer.
//!
//! ## Usage
//!
//! ```bash
//! # Temperatures of saved spectra
//! specthermo analyze spectra/*.txt --calibration sample_a.clb
//!
//! # One minute on the built-in simulator with PID regulation
//! specthermo simulate --seconds 60 --calibration sample_a.clb --pid 10,300,0 --set-point 400
//!
//! # Check a configuration file
//! specthermo check-config Config.cfg
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
