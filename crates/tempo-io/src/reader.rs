//! Delimited dataset reader with full input validation.

use std::path::{Path, PathBuf};

use tempo_elastic::Sequence;
use tempo_search::ClassLabel;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::Dataset;

/// Reads a labeled time series dataset from a delimited text file.
///
/// Expected format (UCR convention):
/// - No header row.
/// - One row per sequence: `label,v0,v1,...,vn` with an integer class label
///   in the first field.
/// - Fields separated by comma or tab, inferred from the first line.
/// - All rows must have the same number of fields.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed record |
/// | [`IoError::EmptyDataset`] | Zero data rows |
/// | [`IoError::RowLength`] | Row has a different field count than the first row |
/// | [`IoError::InvalidLabel`] | First field is not an integer |
/// | [`IoError::NonFiniteValue`] | Value cell is NaN, Inf, or unparseable |
/// | [`IoError::InvalidSequence`] | Row has a label but no values |
pub struct DatasetReader {
    path: PathBuf,
}

impl DatasetReader {
    /// Create a new reader for the given file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        // 1. Read the file up front so the delimiter can be sniffed from the
        //    first line (FileNotFound on failure).
        let raw = std::fs::read_to_string(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let delimiter = sniff_delimiter(&raw);
        debug!(
            delimiter = if delimiter == b'\t' { "tab" } else { "comma" },
            "field delimiter sniffed"
        );

        // 2. Build the CSV reader, headerless per the UCR convention.
        // flexible(true) allows rows with varying field counts so that our own
        // RowLength check fires instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(raw.as_bytes());

        // 3. Iterate rows with validation. The first row fixes the expected
        //    field count.
        let mut expected_fields: Option<usize> = None;
        let mut labels = Vec::new();
        let mut series = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            let expected = *expected_fields.get_or_insert(record.len());
            if record.len() != expected {
                return Err(IoError::RowLength {
                    path: self.path.clone(),
                    row_index,
                    expected,
                    got: record.len(),
                });
            }

            // Parse the class label (first field, strict integer).
            let label_raw = record.get(0).unwrap_or("");
            let label: i64 = label_raw.parse().map_err(|_| IoError::InvalidLabel {
                path: self.path.clone(),
                row_index,
                raw: label_raw.to_string(),
            })?;

            // Parse the sequence values (fields 1..n).
            let mut values = Vec::with_capacity(record.len().saturating_sub(1));
            for col_index in 1..record.len() {
                let raw_value = record.get(col_index).unwrap_or("");
                let value: f64 = raw_value.parse().map_err(|_| IoError::NonFiniteValue {
                    path: self.path.clone(),
                    row_index,
                    col_index: col_index - 1,
                    raw: raw_value.to_string(),
                })?;
                if !value.is_finite() {
                    return Err(IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index: col_index - 1,
                        raw: raw_value.to_string(),
                    });
                }
                values.push(value);
            }

            // A label-only row produces an empty value vector, which the
            // sequence constructor rejects.
            let sequence = Sequence::new(values).map_err(|e| IoError::InvalidSequence {
                path: self.path.clone(),
                row_index,
                source: e,
            })?;

            labels.push(ClassLabel::new(label));
            series.push(sequence);
        }

        // 4. Check for an empty dataset.
        if series.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let name = self
            .path
            .file_stem()
            .map_or_else(String::new, |s| s.to_string_lossy().into_owned());

        info!(
            name = %name,
            n_sequences = series.len(),
            n_timesteps = series.first().map_or(0, Sequence::len),
            "dataset loaded"
        );

        Ok(Dataset {
            name,
            labels,
            series,
        })
    }
}

/// Infer the field delimiter from the first line: tab when present, else comma.
fn sniff_delimiter(raw: &str) -> u8 {
    let first_line = raw.lines().next().unwrap_or("");
    if first_line.contains('\t') { b'\t' } else { b',' }
}
