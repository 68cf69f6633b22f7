//! Domain types for tempo-io.

use std::collections::BTreeSet;

use tempo_elastic::Sequence;
use tempo_search::ClassLabel;

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labeled dataset of time series.
///
/// Produced by [`DatasetReader`](crate::DatasetReader). Labels and series are
/// stored in parallel vectors: `labels[i]` is the class of `series[i]`.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Dataset name, taken from the file stem.
    pub name: String,
    /// Class labels in row order.
    pub labels: Vec<ClassLabel>,
    /// Validated sequences in the same order as `labels`.
    pub series: Vec<Sequence>,
}

impl Dataset {
    /// Return the number of sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the dataset holds no sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Return the number of distinct class labels.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.labels
            .iter()
            .map(|l| l.value())
            .collect::<BTreeSet<i64>>()
            .len()
    }
}
