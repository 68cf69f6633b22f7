//! Result types for warping window search and classification.

use tempo_elastic::Distance;

use crate::fastwws::NnEntry;
use crate::label::ClassLabel;

/// Result of a warping window search over a labeled training set.
#[derive(Debug, Clone)]
pub struct WindowSearchResult {
    /// The window radius with the lowest leave-one-out error; ties go to the
    /// smallest radius.
    pub best_window: usize,
    /// Leave-one-out error rate at `best_window`.
    pub best_error: f64,
    /// Leave-one-out error rate for every searched radius, indexed by radius.
    pub errors: Vec<f64>,
    /// Nearest neighbor of each training sequence at `best_window`.
    pub neighbors: Vec<NnEntry>,
    /// Total number of full DTW evaluations spent by the search.
    pub dtw_count: usize,
}

impl WindowSearchResult {
    /// Leave-one-out accuracy at the best window.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        1.0 - self.best_error
    }
}

/// A single nearest-neighbor prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label.
    pub label: ClassLabel,
    /// Index of the nearest training sequence.
    pub neighbor: usize,
    /// DTW distance to the nearest training sequence.
    pub distance: Distance,
}

/// Result of classifying a labeled evaluation set.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Per-query predictions, in input order.
    pub predictions: Vec<Prediction>,
    /// Number of predictions whose label matched the ground truth.
    pub n_correct: usize,
}

impl ClassificationResult {
    /// Fraction of correctly classified queries; 0 for an empty query set.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.predictions.is_empty() {
            return 0.0;
        }
        self.n_correct as f64 / self.predictions.len() as f64
    }
}
