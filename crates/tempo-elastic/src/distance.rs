//! Distance newtype returned by the DTW and Euclidean kernels.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative elastic distance in root space.
///
/// Kernels accumulate squared differences internally and take the square root
/// exactly once, at this boundary. The value is never NaN; an unreachable
/// alignment (or an early-abandoned computation) is represented by
/// [`Distance::INFINITY`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance(f64);

impl Distance {
    /// The sentinel for "no admissible alignment" or "abandoned".
    pub const INFINITY: Distance = Distance(f64::INFINITY);

    /// Wrap a raw distance value.
    pub(crate) fn new(value: f64) -> Self {
        debug_assert!(!value.is_nan(), "distance must not be NaN");
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether this distance is finite (not the abandonment sentinel).
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Total ordering over distances; infinity sorts last.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
