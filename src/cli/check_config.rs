use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

use specthermo::config::Config;

/// Report every entry of a configuration file and validate it
pub fn run(file: PathBuf, toml: bool) -> Result<()> {
    info!("specthermo Config Check");
    info!("=======================");
    info!("File: {}", file.display());

    let (config, mut report) = match Config::from_file(&file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };
    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    config.load_calibrations(dir, &mut report);

    // Use colorized output if available
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if toml {
        println!("{}", config.to_toml_string()?);
    }

    if let Err(e) = config.validate() {
        eprintln!("Validation FAILED: {}", e);
        std::process::exit(1);
    }
    println!("Validation PASSED");
    Ok(())
}
