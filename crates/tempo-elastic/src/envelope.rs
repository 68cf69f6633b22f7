//! Warping envelopes and the LB_Keogh lower bound.
//!
//! The envelope of a sequence under a warping window is the pair of running
//! extrema over a sliding window of `2 * radius + 1` points: `upper[i]` is the
//! max and `lower[i]` the min of the values within `radius` positions of `i`.
//! Any DTW alignment under that window must match position `i` of the other
//! sequence against some value inside `[lower[i], upper[i]]`, which is what
//! makes LB_Keogh an admissible lower bound.

use std::collections::VecDeque;

use crate::distance::Distance;
use crate::series::SequenceView;
use crate::window::WarpingWindow;

/// Upper and lower warping envelopes of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    upper: Vec<f64>,
    lower: Vec<f64>,
}

impl Envelope {
    /// Compute both envelopes of `series` under `window` in one O(n) pass.
    ///
    /// Uses a pair of monotonic deques: the max deque holds indices whose
    /// values are strictly decreasing, the min deque indices whose values are
    /// strictly increasing, so the front of each deque is always the extremum
    /// of the current sliding window.
    #[must_use]
    pub fn compute(series: SequenceView<'_>, window: WarpingWindow) -> Self {
        let values = series.values();
        let n = values.len();
        let radius = window.effective_radius(n, n);

        let mut upper = Vec::with_capacity(n);
        let mut lower = Vec::with_capacity(n);
        let mut max_deque: VecDeque<usize> = VecDeque::new();
        let mut min_deque: VecDeque<usize> = VecDeque::new();
        let mut next_to_add = 0usize;

        for i in 0..n {
            let hi = (i + radius).min(n - 1);
            let lo = i.saturating_sub(radius);

            while next_to_add <= hi {
                while max_deque.back().is_some_and(|&k| values[k] <= values[next_to_add]) {
                    max_deque.pop_back();
                }
                max_deque.push_back(next_to_add);
                while min_deque.back().is_some_and(|&k| values[k] >= values[next_to_add]) {
                    min_deque.pop_back();
                }
                min_deque.push_back(next_to_add);
                next_to_add += 1;
            }

            while max_deque.front().is_some_and(|&k| k < lo) {
                max_deque.pop_front();
            }
            while min_deque.front().is_some_and(|&k| k < lo) {
                min_deque.pop_front();
            }

            upper.push(values[*max_deque.front().expect("max deque covers the current window")]);
            lower.push(values[*min_deque.front().expect("min deque covers the current window")]);
        }

        Self { upper, lower }
    }

    /// Return the upper envelope.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Return the lower envelope.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Return the envelope length (equal to the source sequence length).
    #[must_use]
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    /// Always false: envelopes are built from non-empty sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// LB_Keogh in squared space: sum of squared overshoots of `series` outside
/// `envelope`.
///
/// A lower bound on the squared windowed DTW distance between `series` and the
/// sequence the envelope was built from, provided the envelope was computed at
/// the same (or a wider) window. Positions where the value falls inside the
/// envelope contribute nothing. If the lengths differ, only the common prefix
/// is scanned, which keeps the bound admissible.
#[must_use]
pub fn lb_keogh_squared(series: SequenceView<'_>, envelope: &Envelope) -> f64 {
    let values = series.values();
    let mut sum = 0.0;
    for ((&v, &up), &lo) in values.iter().zip(&envelope.upper).zip(&envelope.lower) {
        if v > up {
            let d = v - up;
            sum += d * d;
        } else if v < lo {
            let d = lo - v;
            sum += d * d;
        }
    }
    sum
}

/// LB_Keogh in root space.
#[must_use]
pub fn lb_keogh(series: SequenceView<'_>, envelope: &Envelope) -> Distance {
    Distance::new(lb_keogh_squared(series, envelope).sqrt())
}
