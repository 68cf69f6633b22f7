//! Nearest-neighbor DTW classification against a fixed training set.

use rayon::prelude::*;
use tracing::{info, instrument};

use tempo_elastic::{
    Distance, Dtw, Envelope, Sequence, SequenceView, WarpingWindow, lb_keogh_squared,
};

use crate::error::SearchError;
use crate::label::ClassLabel;
use crate::result::{ClassificationResult, Prediction};

/// 1-nearest-neighbor classifier over windowed DTW.
///
/// Each query is classified with a pruning cascade: the query's Keogh
/// envelope is built once, every training sequence is screened with
/// LB_Keogh against the best distance so far, and only survivors pay for an
/// early-abandoning DTW.
#[derive(Debug, Clone)]
pub struct NnClassifier<'a> {
    train: &'a [Sequence],
    labels: &'a [ClassLabel],
    window: usize,
    len: usize,
    dtw: Dtw,
}

impl<'a> NnClassifier<'a> {
    /// Create a classifier over `train` at the given window radius.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SearchError::EmptyTrainingSet`] | `train` is empty |
    /// | [`SearchError::LabelCountMismatch`] | `labels.len() != train.len()` |
    /// | [`SearchError::UnequalLengths`] | a training sequence length differs from the first |
    pub fn new(
        train: &'a [Sequence],
        labels: &'a [ClassLabel],
        window: usize,
    ) -> Result<Self, SearchError> {
        if train.is_empty() {
            return Err(SearchError::EmptyTrainingSet);
        }
        if labels.len() != train.len() {
            return Err(SearchError::LabelCountMismatch {
                n_labels: labels.len(),
                n_sequences: train.len(),
            });
        }
        let len = train[0].len();
        for (index, s) in train.iter().enumerate() {
            if s.len() != len {
                return Err(SearchError::UnequalLengths {
                    index,
                    len: s.len(),
                    expected: len,
                });
            }
        }
        Ok(Self {
            train,
            labels,
            window,
            len,
            dtw: Dtw::with_radius(window),
        })
    }

    /// Return the window radius.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Classify a single query against the training set.
    ///
    /// Panics when the query length differs from the training length; the
    /// LB_Keogh screen is only a valid bound for equal lengths.
    #[must_use]
    pub fn classify(&self, query: SequenceView<'_>) -> Prediction {
        assert_eq!(
            query.len(),
            self.len,
            "query length must match the training length"
        );
        let envelope = Envelope::compute(query, WarpingWindow::Radius(self.window));

        let mut best_index = 0usize;
        let mut best = Distance::INFINITY;
        for (i, candidate) in self.train.iter().enumerate() {
            let best_squared = best.value() * best.value();
            if lb_keogh_squared(candidate.as_view(), &envelope) >= best_squared {
                continue;
            }
            let d = self
                .dtw
                .distance_with_cutoff(query, candidate.as_view(), best.value());
            if d.value() < best.value() {
                best = d;
                best_index = i;
            }
        }

        Prediction {
            label: self.labels[best_index],
            neighbor: best_index,
            distance: best,
        }
    }

    /// Classify a batch of queries in parallel.
    #[must_use]
    #[instrument(skip(self, queries), fields(n_queries = queries.len(), window = self.window))]
    pub fn classify_batch(&self, queries: &[Sequence]) -> Vec<Prediction> {
        queries
            .par_iter()
            .map(|q| self.classify(q.as_view()))
            .collect()
    }

    /// Classify `queries` and score the predictions against `truth`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SearchError::LabelCountMismatch`] | `truth.len() != queries.len()` |
    pub fn evaluate(
        &self,
        queries: &[Sequence],
        truth: &[ClassLabel],
    ) -> Result<ClassificationResult, SearchError> {
        if truth.len() != queries.len() {
            return Err(SearchError::LabelCountMismatch {
                n_labels: truth.len(),
                n_sequences: queries.len(),
            });
        }

        let predictions = self.classify_batch(queries);
        let n_correct = predictions
            .iter()
            .zip(truth)
            .filter(|&(p, &t)| p.label == t)
            .count();

        info!(
            n_queries = queries.len(),
            n_correct, "evaluation complete"
        );
        Ok(ClassificationResult {
            predictions,
            n_correct,
        })
    }
}
