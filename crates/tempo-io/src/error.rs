//! I/O error types for tempo-io.

use std::path::PathBuf;

use tempo_elastic::ElasticError;

/// Errors from file I/O, dataset parsing, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the dataset file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the dataset file contains zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the dataset file.
        path: PathBuf,
    },

    /// Returned when a row has a different number of fields than the first row.
    #[error("inconsistent row length in {path}: row {row_index} has {got} fields, expected {expected}")]
    RowLength {
        /// Path to the dataset file.
        path: PathBuf,
        /// Zero-based row index.
        row_index: usize,
        /// Expected number of fields (from the first row).
        expected: usize,
        /// Actual number of fields in this row.
        got: usize,
    },

    /// Returned when a value cell is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the dataset file.
        path: PathBuf,
        /// Zero-based row index.
        row_index: usize,
        /// Zero-based value column index (excluding the label column).
        col_index: usize,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when the first field of a row is not an integer class label.
    #[error("invalid class label in {path} at row {row_index}: \"{raw}\" is not an integer")]
    InvalidLabel {
        /// Path to the dataset file.
        path: PathBuf,
        /// Zero-based row index.
        row_index: usize,
        /// The raw string that failed to parse.
        raw: String,
    },

    /// Returned when a parsed row does not form a valid sequence.
    #[error("invalid sequence in {path} at row {row_index}")]
    InvalidSequence {
        /// Path to the dataset file.
        path: PathBuf,
        /// Zero-based row index.
        row_index: usize,
        /// Underlying validation error.
        source: ElasticError,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
