//! Lazy lower-bound cascade for nearest-neighbor pruning.
//!
//! A [`LazyAssessment`] tracks one pair of sequences across the whole window
//! sweep. Each time the search asks the pair to beat a score, the cascade
//! spends the cheapest evidence first: the window-independent LB_Kim floor,
//! then partial and full LB_Keogh scans in both directions, and only as a
//! last resort a full DTW. Work is never repeated: partial scans resume where
//! they stopped, completed bounds persist, and an exact DTW distance is
//! reused at every window its alignment path stays inside.
//!
//! Bounds established at window `w` lower-bound the distance at any window
//! at or below `w` (narrowing a band can only raise the distance), so when
//! the window shrinks the stored evidence survives. When the window grows the
//! evidence is demoted to the LB_Kim floor, the only bound that holds at
//! every radius.

use tempo_elastic::{Dtw, WarpingWindow, squared_euclidean};

use crate::cache::SequenceStatsCache;
use crate::config::Refinement;

/// Where the cascade last stopped for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Only the LB_Kim floor has been computed.
    LbKim,
    /// The query-envelope Keogh scan stopped partway.
    PartialKeoghQr,
    /// The query-envelope Keogh scan ran to completion.
    FullKeoghQr,
    /// The reference-envelope Keogh scan stopped partway.
    PartialKeoghRq,
    /// The reference-envelope Keogh scan ran to completion.
    FullKeoghRq,
    /// The pair has been refined to an exact DTW distance.
    FullDtw,
    /// A bound from an earlier window is standing in at the current one.
    PreviousWindowLb,
    /// An exact DTW from an earlier window is standing in at the current one.
    PreviousWindowDtw,
}

/// Outcome of asking a pair to beat a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A lower bound already meets the score; no DTW was needed.
    PrunedByLowerBound,
    /// The exact distance meets the score.
    PrunedByDtw,
    /// The exact distance beats the score: this pair is a new nearest
    /// neighbor candidate.
    NewBest,
}

/// Reusable pruning state for one (query, reference) pair.
///
/// All distances are kept in squared space; the pair is stored with
/// `query_index < reference_index` regardless of argument order.
#[derive(Debug, Clone)]
pub struct LazyAssessment {
    query_index: usize,
    reference_index: usize,
    len: usize,
    stage: Stage,
    /// Best provable squared lower bound at the current window; the exact
    /// squared distance once `stage` is [`Stage::FullDtw`].
    best_min: f64,
    kim_squared: f64,
    kim_terms: usize,
    euclidean_squared: Option<f64>,
    current_window: usize,
    /// Window the current evidence was established at; `usize::MAX` marks
    /// window-independent evidence.
    evidence_window: usize,
    index_stopped: usize,
    old_index_stopped: usize,
    scratch: f64,
    min_valid_window: usize,
    valid_through_window: usize,
    dtw_runs: usize,
}

impl LazyAssessment {
    /// Create an assessment for the pair `(a, b)`.
    ///
    /// Computes the LB_Kim floor immediately. Panics when the two sequences
    /// differ in length.
    #[must_use]
    pub fn new(a: usize, b: usize, cache: &SequenceStatsCache<'_>) -> Self {
        let mut assessment = Self {
            query_index: 0,
            reference_index: 0,
            len: 0,
            stage: Stage::LbKim,
            best_min: 0.0,
            kim_squared: 0.0,
            kim_terms: 2,
            euclidean_squared: None,
            current_window: usize::MAX,
            evidence_window: usize::MAX,
            index_stopped: 0,
            old_index_stopped: 0,
            scratch: 0.0,
            min_valid_window: 0,
            valid_through_window: 0,
            dtw_runs: 0,
        };
        assessment.assign(a, b, cache);
        assessment
    }

    /// Re-target this assessment at the pair `(a, b)`, dropping all stored
    /// evidence but keeping the cumulative DTW counter.
    ///
    /// Panics when the two sequences differ in length.
    pub fn assign(&mut self, a: usize, b: usize, cache: &SequenceStatsCache<'_>) {
        let (query_index, reference_index) = if a < b { (a, b) } else { (b, a) };
        let len = cache.values(query_index).len();
        assert_eq!(
            len,
            cache.values(reference_index).len(),
            "lazy assessment requires equal-length sequences"
        );

        self.query_index = query_index;
        self.reference_index = reference_index;
        self.len = len;
        self.stage = Stage::LbKim;
        self.euclidean_squared = None;
        self.current_window = usize::MAX;
        self.index_stopped = 0;
        self.old_index_stopped = 0;
        self.scratch = 0.0;
        self.min_valid_window = 0;
        self.valid_through_window = 0;
        self.compute_kim(cache);
    }

    /// LB_Kim floor: endpoint differences always, extrema differences only
    /// when the extremum sits strictly inside both sequences (endpoint
    /// extrema are already covered by the endpoint terms).
    fn compute_kim(&mut self, cache: &SequenceStatsCache<'_>) {
        let q = cache.values(self.query_index);
        let r = cache.values(self.reference_index);
        let last = self.len - 1;

        let first_diff = q[0] - r[0];
        let mut sum = first_diff * first_diff;
        let mut terms = 1usize;
        // A single-point pair has one alignment cell, not two.
        if last > 0 {
            let last_diff = q[last] - r[last];
            sum += last_diff * last_diff;
            terms += 1;
        }

        if !cache.is_min_first(self.query_index)
            && !cache.is_min_last(self.query_index)
            && !cache.is_min_first(self.reference_index)
            && !cache.is_min_last(self.reference_index)
        {
            let diff = cache.min(self.query_index) - cache.min(self.reference_index);
            sum += diff * diff;
            terms += 1;
        }
        if !cache.is_max_first(self.query_index)
            && !cache.is_max_last(self.query_index)
            && !cache.is_max_first(self.reference_index)
            && !cache.is_max_last(self.reference_index)
        {
            let diff = cache.max(self.query_index) - cache.max(self.reference_index);
            sum += diff * diff;
            terms += 1;
        }

        self.kim_squared = sum;
        self.kim_terms = terms;
        self.best_min = sum;
        self.evidence_window = usize::MAX;
    }

    /// Move the assessment to `window`, keeping whatever evidence provably
    /// still holds there.
    fn set_window(&mut self, window: usize) {
        if self.current_window == window {
            return;
        }
        self.current_window = window;

        if self.stage == Stage::FullDtw {
            if !(self.min_valid_window <= window && window <= self.valid_through_window) {
                self.stage = Stage::PreviousWindowDtw;
            }
        } else {
            self.old_index_stopped = self.index_stopped;
            self.stage = Stage::PreviousWindowLb;
        }

        // Bounds only hold at or below the window that produced them.
        if self.evidence_window != usize::MAX && window > self.evidence_window {
            self.best_min = self.kim_squared;
            self.evidence_window = usize::MAX;
        }
    }

    /// Ask the pair to beat `score` (squared) at `window`.
    ///
    /// Runs the cascade from wherever it last stopped. Returns
    /// [`Verdict::NewBest`] only when the exact distance at `window` is below
    /// `score`; the exact value is then available via
    /// [`LazyAssessment::squared_distance_at`]. `refinement` picks the DTW
    /// kernel used when the bounds run out: the cell-pruned flavors trade
    /// the path-tracking kernel's reusable validity interval for a faster
    /// single evaluation.
    pub fn try_to_beat(
        &mut self,
        cache: &mut SequenceStatsCache<'_>,
        window: usize,
        score: f64,
        refinement: Refinement,
    ) -> Verdict {
        self.set_window(window);

        loop {
            match self.stage {
                Stage::PreviousWindowLb | Stage::PreviousWindowDtw | Stage::LbKim => {
                    if self.best_min >= score {
                        return Verdict::PrunedByLowerBound;
                    }
                    self.index_stopped = 0;
                    self.scratch = 0.0;
                    self.stage = Stage::PartialKeoghQr;
                }
                Stage::PartialKeoghQr => {
                    if self.best_min >= score {
                        return Verdict::PrunedByLowerBound;
                    }
                    cache.ensure_envelope(self.query_index, window);
                    self.scan_keogh(cache, self.query_index, self.reference_index, window, score);
                    self.best_min = self.best_min.max(self.scratch);
                    self.evidence_window = window;
                    if self.best_min >= score {
                        self.stage = if self.index_stopped < self.len {
                            Stage::PartialKeoghQr
                        } else {
                            Stage::FullKeoghQr
                        };
                        return Verdict::PrunedByLowerBound;
                    }
                    self.stage = Stage::FullKeoghQr;
                }
                Stage::FullKeoghQr => {
                    if self.best_min >= score {
                        return Verdict::PrunedByLowerBound;
                    }
                    self.index_stopped = 0;
                    self.scratch = 0.0;
                    self.stage = Stage::PartialKeoghRq;
                }
                Stage::PartialKeoghRq => {
                    if self.best_min >= score {
                        return Verdict::PrunedByLowerBound;
                    }
                    cache.ensure_envelope(self.reference_index, window);
                    self.scan_keogh(cache, self.reference_index, self.query_index, window, score);
                    self.best_min = self.best_min.max(self.scratch);
                    self.evidence_window = window;
                    if self.best_min >= score {
                        self.stage = if self.index_stopped < self.len {
                            Stage::PartialKeoghRq
                        } else {
                            Stage::FullKeoghRq
                        };
                        return Verdict::PrunedByLowerBound;
                    }
                    self.stage = Stage::FullKeoghRq;
                }
                Stage::FullKeoghRq => {
                    if self.best_min >= score {
                        return Verdict::PrunedByLowerBound;
                    }
                    let query = cache.view(self.query_index);
                    let reference = cache.view(self.reference_index);
                    let dtw = Dtw::new(WarpingWindow::Radius(window));
                    match refinement {
                        Refinement::Windowed => {
                            let details = dtw.details(query, reference);
                            self.best_min = self.best_min.max(details.squared_distance);
                            self.min_valid_window = details.path_width;
                        }
                        Refinement::Pruned => {
                            let squared = dtw.pruned_squared(query, reference);
                            self.best_min = self.best_min.max(squared);
                            self.min_valid_window = window;
                        }
                        Refinement::PrunedWithSeed => {
                            let bound = self.euclidean_bound(cache);
                            let squared = dtw.pruned_squared_with_bound(query, reference, bound);
                            self.best_min = self.best_min.max(squared);
                            self.min_valid_window = window;
                        }
                    }
                    self.valid_through_window = window;
                    self.evidence_window = window;
                    self.dtw_runs += 1;
                    self.stage = Stage::FullDtw;
                }
                Stage::FullDtw => {
                    if self.best_min >= score {
                        return Verdict::PrunedByDtw;
                    }
                    return Verdict::NewBest;
                }
            }
        }
    }

    /// Resume the Keogh scan of `values_of` against the envelope of
    /// `envelope_of`, visiting positions by descending absolute value and
    /// stopping as soon as the partial sum reaches `score`.
    fn scan_keogh(
        &mut self,
        cache: &SequenceStatsCache<'_>,
        envelope_of: usize,
        values_of: usize,
        window: usize,
        score: f64,
    ) {
        let envelope = cache.envelope(envelope_of, window);
        let upper = envelope.upper();
        let lower = envelope.lower();
        let values = cache.values(values_of);

        while self.index_stopped < self.len && self.scratch < score {
            let pos = cache.ranked_index(values_of, self.index_stopped);
            let v = values[pos];
            if v > upper[pos] {
                let diff = v - upper[pos];
                self.scratch += diff * diff;
            } else if v < lower[pos] {
                let diff = lower[pos] - v;
                self.scratch += diff * diff;
            }
            self.index_stopped += 1;
        }
    }

    /// Squared locked-step distance of the pair, computed once per pair and
    /// reused as the pruning bound for cell-pruned refinement.
    fn euclidean_bound(&mut self, cache: &SequenceStatsCache<'_>) -> f64 {
        let (q, r) = (self.query_index, self.reference_index);
        *self
            .euclidean_squared
            .get_or_insert_with(|| squared_euclidean(cache.view(q), cache.view(r)))
    }

    /// Rank pairs by how promising further work on them is: lower scores are
    /// examined first. Normalizes the current bound by the number of terms
    /// that produced it, so a weak bound built from many terms ranks as less
    /// promising than the same bound built from a few.
    #[must_use]
    pub fn ranking_score(&self) -> f64 {
        match self.stage {
            Stage::FullKeoghQr | Stage::FullKeoghRq | Stage::FullDtw => {
                self.best_min / self.len as f64
            }
            Stage::LbKim => self.best_min / self.kim_terms as f64,
            Stage::PartialKeoghQr | Stage::PartialKeoghRq => {
                self.best_min / self.index_stopped as f64
            }
            Stage::PreviousWindowDtw => 0.8 * self.best_min / self.len as f64,
            Stage::PreviousWindowLb => {
                if self.old_index_stopped == 0 {
                    self.best_min / self.kim_terms as f64
                } else {
                    self.best_min / self.old_index_stopped as f64
                }
            }
        }
    }

    /// Exact squared DTW distance at `window`.
    ///
    /// Panics unless the pair has been refined and the refinement's validity
    /// interval covers `window`.
    #[must_use]
    pub fn squared_distance_at(&self, window: usize) -> f64 {
        assert!(
            self.stage == Stage::FullDtw
                && self.min_valid_window <= window
                && window <= self.valid_through_window,
            "no exact distance available at window {window}"
        );
        self.best_min
    }

    /// Smallest window radius the refined distance stays exact at.
    ///
    /// Panics unless the pair has been refined to a full DTW.
    #[must_use]
    pub fn min_valid_window(&self) -> usize {
        assert!(
            self.stage == Stage::FullDtw,
            "pair has not been refined to a full DTW"
        );
        self.min_valid_window
    }

    /// Current best provable squared lower bound (the exact squared distance
    /// once the pair is refined).
    #[must_use]
    pub fn best_bound_squared(&self) -> f64 {
        self.best_min
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Cumulative number of full DTW evaluations, preserved across
    /// [`LazyAssessment::assign`].
    #[must_use]
    pub fn dtw_runs(&self) -> usize {
        self.dtw_runs
    }

    #[must_use]
    pub fn query_index(&self) -> usize {
        self.query_index
    }

    #[must_use]
    pub fn reference_index(&self) -> usize {
        self.reference_index
    }

    /// Given one endpoint of the pair, return the other.
    #[must_use]
    pub fn other_index(&self, index: usize) -> usize {
        if index == self.query_index {
            self.reference_index
        } else {
            self.query_index
        }
    }
}
