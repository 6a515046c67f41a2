/// Errors raised while reading or writing two-column data files
#[derive(Debug, thiserror::Error)]
pub enum DataFileError {
    /// I/O error on the underlying file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Delimited-text parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A data line holds fewer than two fields
    #[error("Line {line}: expected two columns, found {found}")]
    MissingColumn {
        /// 1-based line number in the file
        line: u64,
        /// Number of fields found
        found: usize,
    },

    /// A field is not a number
    #[error("Line {line}: cannot parse '{value}' as a number")]
    InvalidNumber {
        /// 1-based line number in the file
        line: u64,
        /// Offending field
        value: String,
    },

    /// A SpectraSuite file is shorter than its fixed header
    #[error("SpectraSuite file truncated: {lines} lines, header alone needs {header}")]
    TruncatedHeader {
        /// Lines present in the file
        lines: usize,
        /// Header length
        header: usize,
    },

    /// Columns to be written differ in length
    #[error("Column length mismatch: {first} vs {second}")]
    LengthMismatch {
        /// Length of the first column
        first: usize,
        /// Length of the second column
        second: usize,
    },
}
