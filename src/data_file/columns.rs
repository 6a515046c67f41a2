use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use super::DataFileError;

/// First line of files exported by SpectraSuite
pub const SPECTRASUITE_MARKER: &str = "SpectraSuite Data File";

/// Header lines preceding the data in a SpectraSuite file
pub const SPECTRASUITE_HEADER_LINES: usize = 17;

/// Delimiter used when writing columns
pub const COLUMN_DELIMITER: &str = "    ";

/// Two numeric columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    /// First column (wavelengths, or elapsed seconds)
    pub first: Vec<f64>,
    /// Second column (intensities, temperatures or coefficients)
    pub second: Vec<f64>,
}

impl Columns {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Read a two-column file from disk
pub fn read_columns<P: AsRef<Path>>(path: P) -> Result<Columns, DataFileError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let columns = parse_columns(&content)?;
    debug!("Read {} rows from {}", columns.len(), path.display());
    Ok(columns)
}

/// Parse the text of a two-column file.
///
/// Fields beyond the second one are ignored.
pub fn parse_columns(content: &str) -> Result<Columns, DataFileError> {
    let lines: Vec<&str> = content.lines().collect();

    let (body, line_offset) = if lines.first().map(|l| l.trim_end()) == Some(SPECTRASUITE_MARKER)
    {
        if lines.len() <= SPECTRASUITE_HEADER_LINES {
            return Err(DataFileError::TruncatedHeader {
                lines: lines.len(),
                header: SPECTRASUITE_HEADER_LINES,
            });
        }
        let data = &lines[SPECTRASUITE_HEADER_LINES..lines.len() - 1];
        let body: Vec<String> = data.iter().map(|l| l.replace(',', ".")).collect();
        (body.join("\n"), SPECTRASUITE_HEADER_LINES as u64)
    } else {
        (content.to_string(), 0)
    };

    let body = body.replace('\t', " ");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    let mut columns = Columns::default();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0) + line_offset;

        let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
        match fields.len() {
            0 => continue,
            1 => return Err(DataFileError::MissingColumn { line, found: 1 }),
            _ => {}
        }
        columns.first.push(parse_field(fields[0], line)?);
        columns.second.push(parse_field(fields[1], line)?);
    }
    Ok(columns)
}

fn parse_field(field: &str, line: u64) -> Result<f64, DataFileError> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| DataFileError::InvalidNumber {
            line,
            value: field.to_string(),
        })
}

/// Write two equally long columns, one row per line.
pub fn write_columns<P: AsRef<Path>>(
    path: P,
    first: &[f64],
    second: &[f64],
) -> Result<(), DataFileError> {
    if first.len() != second.len() {
        return Err(DataFileError::LengthMismatch {
            first: first.len(),
            second: second.len(),
        });
    }

    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    for (a, b) in first.iter().zip(second) {
        writeln!(writer, "{}{}{}", a, COLUMN_DELIMITER, b)?;
    }
    writer.flush()?;
    debug!("Wrote {} rows to {}", first.len(), path.display());
    Ok(())
}
