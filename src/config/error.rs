use std::io;
use std::path::PathBuf;

use crate::pid::PidError;

/// Errors raised while loading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// TOML syntax or type error
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A section holds an unusable value
    #[error("Invalid {section} settings: {reason}")]
    Invalid {
        /// Configuration section
        section: &'static str,
        /// What is wrong
        reason: String,
    },

    /// PID settings rejected by the controller
    #[error("Invalid PID settings: {0}")]
    Pid(#[from] PidError),
}
