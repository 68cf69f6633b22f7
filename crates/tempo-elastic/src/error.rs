//! Error types for sequence validation.

/// Errors from constructing or validating sequences.
#[derive(Debug, thiserror::Error)]
pub enum ElasticError {
    /// Returned when constructing a sequence from an empty vector or slice.
    #[error("sequence must contain at least one value")]
    EmptySequence,

    /// Returned when a sequence value is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFiniteValue {
        /// Index of the offending value.
        index: usize,
    },
}
