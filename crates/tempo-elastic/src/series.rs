//! Validated sequence types.
//!
//! A [`Sequence`] owns its values and guarantees, by construction, that it is
//! non-empty and contains only finite floats. Every distance kernel in this
//! crate relies on those two invariants, so they are checked exactly once, at
//! the boundary. [`SequenceView`] is the borrowed counterpart used by the
//! kernels themselves; it is `Copy` and cheap to pass around.

use std::ops::Index;

use crate::error::ElasticError;

/// An owned, validated time series: non-empty, all values finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence(Vec<f64>);

impl Sequence {
    /// Create a new sequence, validating the input.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ElasticError::EmptySequence`] | `values` is empty |
    /// | [`ElasticError::NonFiniteValue`] | some value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, ElasticError> {
        validate(&values)?;
        Ok(Self(values))
    }

    /// Borrow this sequence as a [`SequenceView`].
    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        SequenceView(&self.0)
    }

    /// Return the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: an empty sequence cannot be constructed.
    ///
    /// Provided for the `len`/`is_empty` API convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Consume the sequence and return the underlying vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for Sequence {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Sequence {
    type Error = ElasticError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// A borrowed, validated view over a sequence.
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a>(&'a [f64]);

impl<'a> SequenceView<'a> {
    /// Create a new view, validating the input slice.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Sequence::new`].
    pub fn new(values: &'a [f64]) -> Result<Self, ElasticError> {
        validate(values)?;
        Ok(Self(values))
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn values(self) -> &'a [f64] {
        self.0
    }

    /// Return the number of values.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.len()
    }

    /// Always false: views are validated at construction.
    #[must_use]
    pub fn is_empty(self) -> bool {
        false
    }
}

impl Index<usize> for SequenceView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl AsRef<[f64]> for SequenceView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}

impl<'a> TryFrom<&'a [f64]> for SequenceView<'a> {
    type Error = ElasticError;

    fn try_from(values: &'a [f64]) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

fn validate(values: &[f64]) -> Result<(), ElasticError> {
    if values.is_empty() {
        return Err(ElasticError::EmptySequence);
    }
    for (index, v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(ElasticError::NonFiniteValue { index });
        }
    }
    Ok(())
}
