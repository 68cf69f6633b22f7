//! Euclidean (locked-step) distance kernels.
//!
//! These scan the common prefix of the two sequences, so unequal lengths are
//! permitted; the extra tail of the longer sequence is ignored. For
//! equal-length sequences the squared Euclidean distance is an upper bound on
//! the squared DTW distance at any window, since the locked-step diagonal is
//! always an admissible alignment.

use crate::distance::Distance;
use crate::series::SequenceView;

/// Squared Euclidean distance over the common prefix of `a` and `b`.
#[must_use]
pub fn squared_euclidean(a: SequenceView<'_>, b: SequenceView<'_>) -> f64 {
    let mut sum = 0.0;
    for (&x, &y) in a.values().iter().zip(b.values()) {
        let d = x - y;
        sum += d * d;
    }
    sum
}

/// Euclidean distance over the common prefix of `a` and `b`.
#[must_use]
pub fn euclidean(a: SequenceView<'_>, b: SequenceView<'_>) -> Distance {
    Distance::new(squared_euclidean(a, b).sqrt())
}

/// Squared Euclidean distance with early abandonment.
///
/// Accumulates squared differences and returns `f64::INFINITY` the moment the
/// running sum meets or exceeds `max_allowed`. The sentinel is an expected,
/// frequent outcome on the hot path, never an error. A finite return value is
/// the exact squared distance and is strictly below `max_allowed`.
#[must_use]
pub fn squared_euclidean_early_abandon(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    max_allowed: f64,
) -> f64 {
    let mut sum = 0.0;
    for (&x, &y) in a.values().iter().zip(b.values()) {
        let d = x - y;
        sum += d * d;
        if sum >= max_allowed {
            return f64::INFINITY;
        }
    }
    sum
}
