//! # Application configuration
//!
//! A [`Config`] gathers everything the measurement chain needs at startup:
//! edge search constants, exposure timing, PID settings, driver selection and
//! the calibration tables on offer.
//!
//! Two file formats are read:
//!
//! - TOML (`*.toml`), mapping one-to-one onto the structs:
//!
//! ```toml
//! [edge]
//! method = "Inchworm"
//! epsilon_limit = 1.2
//!
//! [pid]
//! p = 10.0
//! period = 4.5
//!
//! [device.spectrometer]
//! kind = "offline"
//!
//! [[calibrations]]
//! name = "sample_a"
//! kind = "points"
//! ```
//!
//! - the line format of older setups, `key    value` with a four-space
//!   delimiter (see [`LEGACY_KEYS`]). Bad lines never abort the load; every
//!   line is accounted for in the returned [`ConfigReport`].
//!
//! Loading only parses. [`Config::validate`] checks the values as a whole.

mod error;
mod legacy;
mod report;
mod settings;


pub use error::ConfigError;
pub use legacy::{LEGACY_DELIMITER, LEGACY_KEYS};
pub use report::{ConfigEntry, ConfigReport, EntryStatus};
pub use settings::{
    CalibrationSource, Config, DeviceSettings, MeasurementSettings, NamedCalibration,
    PidSettings, CALIBRATION_EXTENSION,
};
