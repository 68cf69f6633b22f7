/// Errors from warping window search and nearest-neighbor classification.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Returned when the training set is empty.
    #[error("training set must contain at least one sequence")]
    EmptyTrainingSet,

    /// Returned when fewer sequences are provided than the search needs.
    #[error("window search needs at least 2 sequences, got {n_sequences}")]
    TooFewSequences {
        /// Number of sequences provided.
        n_sequences: usize,
    },

    /// Returned when the window fraction lies outside `(0, 1]`.
    #[error("max window fraction must lie in (0, 1], got {fraction}")]
    InvalidWindowFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Returned when label and sequence counts disagree.
    #[error("got {n_labels} labels for {n_sequences} sequences")]
    LabelCountMismatch {
        /// Number of labels provided.
        n_labels: usize,
        /// Number of sequences provided.
        n_sequences: usize,
    },

    /// Returned when a sequence's length differs from the first sequence's.
    #[error("sequence {index} has length {len}, expected {expected}")]
    UnequalLengths {
        /// Index of the offending sequence.
        index: usize,
        /// Its length.
        len: usize,
        /// The length of the first sequence.
        expected: usize,
    },
}
