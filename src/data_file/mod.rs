//! # Two-column data files
//!
//! Spectra, calibration tables and temperature histories are stored as plain
//! text with two numeric columns per line. The reader accepts any run of
//! spaces or tabs as delimiter and skips empty lines. Files exported by Ocean
//! Optics SpectraSuite (first line `SpectraSuite Data File`) carry a fixed
//! 17-line header, a trailing footer line and decimal commas; these are
//! recognised and normalised before parsing.
//!
//! Files are written with a four-space delimiter.

mod columns;
mod error;


pub use columns::{
    parse_columns, read_columns, write_columns, Columns, COLUMN_DELIMITER,
    SPECTRASUITE_HEADER_LINES, SPECTRASUITE_MARKER,
};
pub use error::DataFileError;
