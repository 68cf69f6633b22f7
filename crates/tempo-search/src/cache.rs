//! Per-sequence statistics shared across lower-bound evaluations.
//!
//! The window search evaluates LB_Kim and LB_Keogh millions of times over the
//! same training set, so everything that depends only on a sequence (extrema,
//! boundary flags, the visiting order for partial Keogh scans) is computed
//! once up front. Keogh envelopes depend on the window radius and are cached
//! per sequence for the most recent radius, which fits the search's pattern of
//! finishing one radius before moving to the next.

use tempo_elastic::{Envelope, Sequence, SequenceView, WarpingWindow};

/// Precomputed statistics and cached envelopes for a fixed set of sequences.
#[derive(Debug, Clone)]
pub struct SequenceStatsCache<'a> {
    series: &'a [Sequence],
    mins: Vec<f64>,
    maxs: Vec<f64>,
    is_min_first: Vec<bool>,
    is_min_last: Vec<bool>,
    is_max_first: Vec<bool>,
    is_max_last: Vec<bool>,
    sorted_by_abs: Vec<Vec<usize>>,
    envelopes: Vec<Option<(usize, Envelope)>>,
}

impl<'a> SequenceStatsCache<'a> {
    /// Build the cache for `series`. Envelopes are filled lazily via
    /// [`SequenceStatsCache::ensure_envelope`].
    #[must_use]
    pub fn new(series: &'a [Sequence]) -> Self {
        let n = series.len();
        let mut mins = Vec::with_capacity(n);
        let mut maxs = Vec::with_capacity(n);
        let mut is_min_first = Vec::with_capacity(n);
        let mut is_min_last = Vec::with_capacity(n);
        let mut is_max_first = Vec::with_capacity(n);
        let mut is_max_last = Vec::with_capacity(n);
        let mut sorted_by_abs = Vec::with_capacity(n);

        for s in series {
            let values = s.as_view().values();
            let mut index_min = 0usize;
            let mut index_max = 0usize;
            for (i, &v) in values.iter().enumerate() {
                if v < values[index_min] {
                    index_min = i;
                }
                if v > values[index_max] {
                    index_max = i;
                }
            }
            mins.push(values[index_min]);
            maxs.push(values[index_max]);
            is_min_first.push(index_min == 0);
            is_min_last.push(index_min == values.len() - 1);
            is_max_first.push(index_max == 0);
            is_max_last.push(index_max == values.len() - 1);

            // Most extreme values first: partial Keogh scans visit positions
            // in this order to accumulate evidence as fast as possible.
            let mut order: Vec<usize> = (0..values.len()).collect();
            order.sort_by(|&x, &y| values[y].abs().total_cmp(&values[x].abs()));
            sorted_by_abs.push(order);
        }

        Self {
            series,
            mins,
            maxs,
            is_min_first,
            is_min_last,
            is_max_first,
            is_max_last,
            sorted_by_abs,
            envelopes: vec![None; n],
        }
    }

    /// Number of cached sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the cache holds no sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Return a view of sequence `i` borrowed from the underlying slice, not
    /// from the cache, so it can outlive a mutable cache borrow.
    #[must_use]
    pub fn view(&self, i: usize) -> SequenceView<'a> {
        self.series[i].as_view()
    }

    /// Return the raw values of sequence `i`.
    #[must_use]
    pub fn values(&self, i: usize) -> &'a [f64] {
        self.series[i].as_view().values()
    }

    #[must_use]
    pub fn min(&self, i: usize) -> f64 {
        self.mins[i]
    }

    #[must_use]
    pub fn max(&self, i: usize) -> f64 {
        self.maxs[i]
    }

    #[must_use]
    pub fn is_min_first(&self, i: usize) -> bool {
        self.is_min_first[i]
    }

    #[must_use]
    pub fn is_min_last(&self, i: usize) -> bool {
        self.is_min_last[i]
    }

    #[must_use]
    pub fn is_max_first(&self, i: usize) -> bool {
        self.is_max_first[i]
    }

    #[must_use]
    pub fn is_max_last(&self, i: usize) -> bool {
        self.is_max_last[i]
    }

    /// Return the position holding the `rank`-th largest absolute value of
    /// sequence `i` (rank 0 is the most extreme position).
    #[must_use]
    pub fn ranked_index(&self, i: usize, rank: usize) -> usize {
        self.sorted_by_abs[i][rank]
    }

    /// Make sure sequence `i` has an envelope cached for `window`, replacing
    /// an envelope computed at a different radius.
    pub fn ensure_envelope(&mut self, i: usize, window: usize) {
        let stale = match &self.envelopes[i] {
            Some((w, _)) => *w != window,
            None => true,
        };
        if stale {
            let env = Envelope::compute(self.view(i), WarpingWindow::Radius(window));
            self.envelopes[i] = Some((window, env));
        }
    }

    /// Return the envelope of sequence `i` at `window`.
    ///
    /// Panics when the envelope was not prepared at this radius; callers must
    /// call [`SequenceStatsCache::ensure_envelope`] first.
    #[must_use]
    pub fn envelope(&self, i: usize, window: usize) -> &Envelope {
        match &self.envelopes[i] {
            Some((w, env)) if *w == window => env,
            _ => panic!("envelope for sequence {i} not prepared at window {window}"),
        }
    }
}
