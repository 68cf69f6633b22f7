//! Table-driven search for the best warping window.
//!
//! Builds a nearest-neighbor table with one row per window radius and one
//! column per training sequence, processing sequences incrementally and
//! windows from widest to narrowest. An exact DTW computed at one window
//! stays valid down to the width of its alignment path, so a settled
//! neighbor is propagated to every narrower window it covers and the bulk of
//! the table fills without further distance work. The remaining cells lean on
//! the lazy lower-bound cascade, which resumes per-pair evidence instead of
//! recomputing it.
//!
//! The leave-one-out error of every radius falls out of the finished table
//! in a single pass, which is what the window search ultimately reports.

use tracing::{debug, info, instrument};

use tempo_elastic::Sequence;

use crate::cache::SequenceStatsCache;
use crate::config::{Refinement, SearchConfig};
use crate::label::ClassLabel;
use crate::lazy::{LazyAssessment, Verdict};
use crate::result::WindowSearchResult;

/// Whether a table entry is settled or still provisional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NnStatus {
    /// Best candidate seen so far while a cell is still being contested.
    Candidate,
    /// Settled nearest neighbor among the sequences examined so far.
    Confirmed,
}

/// One cell of the nearest-neighbor table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NnEntry {
    /// Index of the nearest neighbor.
    pub index: usize,
    /// Smallest window radius at which `squared_distance` stays exact.
    pub valid_from: usize,
    /// Squared DTW distance to the neighbor.
    pub squared_distance: f64,
    /// Whether this entry is settled.
    pub status: NnStatus,
}

fn entry_distance(entry: Option<NnEntry>) -> f64 {
    entry.map_or(f64::INFINITY, |e| e.squared_distance)
}

/// Run the full window search. Callers validate the input shape; this
/// expects at least two equal-length sequences with matching labels.
#[instrument(skip(series, labels, config), fields(n = series.len()))]
pub(crate) fn search(
    series: &[Sequence],
    labels: &[ClassLabel],
    config: &SearchConfig,
) -> WindowSearchResult {
    let n = series.len();
    let len = series[0].len();
    let max_window = config.resolved_max_window(len);

    let mut cache = SequenceStatsCache::new(series);
    let (table, dtw_count) = build_table(&mut cache, max_window, config.refinement());

    let mut errors = vec![0.0; max_window + 1];
    for (win, row) in table.iter().enumerate() {
        let n_wrong = row
            .iter()
            .enumerate()
            .filter(|&(i, entry)| labels[entry.index] != labels[i])
            .count();
        errors[win] = n_wrong as f64 / n as f64;
    }

    // Descending sweep with <= so ties settle on the smallest radius.
    let mut best_window = max_window;
    let mut best_error = f64::INFINITY;
    for win in (0..=max_window).rev() {
        if errors[win] <= best_error {
            best_error = errors[win];
            best_window = win;
        }
    }

    info!(best_window, best_error, dtw_count, "window search complete");

    let neighbors = table[best_window].clone();
    WindowSearchResult {
        best_window,
        best_error,
        errors,
        neighbors,
        dtw_count,
    }
}

/// Fill the nearest-neighbor table for radii `0..=max_window`.
///
/// Invariant: after sequence `current` is processed, `table[win][s]` for
/// every `s <= current` holds the settled nearest neighbor of `s` among the
/// first `current + 1` sequences, at every radius.
fn build_table(
    cache: &mut SequenceStatsCache<'_>,
    max_window: usize,
    refinement: Refinement,
) -> (Vec<Vec<NnEntry>>, usize) {
    let n = cache.len();
    let mut table: Vec<Vec<Option<NnEntry>>> = vec![vec![None; n]; max_window + 1];
    let mut assessments: Vec<LazyAssessment> = Vec::with_capacity(n.saturating_sub(1));

    for current in 1..n {
        // Re-target the pooled assessments at the pairs (previous, current).
        for previous in 0..current {
            if previous < assessments.len() {
                assessments[previous].assign(previous, current, cache);
            } else {
                assessments.push(LazyAssessment::new(previous, current, cache));
            }
        }

        for win in (0..=max_window).rev() {
            let settled = table[win][current];
            if let Some(entry) = settled
                && entry.status == NnStatus::Confirmed
            {
                // The new sequence already has a settled neighbor here (by
                // propagation from a wider window). Each earlier sequence
                // only needs to know whether the new one beats its own.
                for previous in 0..current {
                    let score = entry_distance(table[win][previous]);
                    let assessment = &mut assessments[previous];
                    if assessment.try_to_beat(cache, win, score, refinement) == Verdict::NewBest {
                        table[win][previous] = Some(NnEntry {
                            index: current,
                            valid_from: assessment.min_valid_window(),
                            squared_distance: assessment.squared_distance_at(win),
                            status: NnStatus::Confirmed,
                        });
                    }
                }
            } else {
                // Contest the cell: most promising challengers first, so the
                // candidate distance drops fast and later challengers prune.
                let mut order: Vec<usize> = (0..current).collect();
                order.sort_by(|&a, &b| {
                    assessments[a]
                        .ranking_score()
                        .total_cmp(&assessments[b].ranking_score())
                });

                for previous in order {
                    let assessment = &mut assessments[previous];

                    let score = entry_distance(table[win][current]);
                    if assessment.try_to_beat(cache, win, score, refinement) == Verdict::NewBest {
                        table[win][current] = Some(NnEntry {
                            index: previous,
                            valid_from: assessment.min_valid_window(),
                            squared_distance: assessment.squared_distance_at(win),
                            status: NnStatus::Candidate,
                        });
                    }

                    let score = entry_distance(table[win][previous]);
                    if assessment.try_to_beat(cache, win, score, refinement) == Verdict::NewBest {
                        table[win][previous] = Some(NnEntry {
                            index: current,
                            valid_from: assessment.min_valid_window(),
                            squared_distance: assessment.squared_distance_at(win),
                            status: NnStatus::Confirmed,
                        });
                    }
                }

                // Every challenger was heard: the surviving candidate is the
                // settled neighbor, exact down to its path width.
                let confirmed = table[win][current]
                    .map(|entry| NnEntry {
                        status: NnStatus::Confirmed,
                        ..entry
                    })
                    .expect("an infinite score is always beaten");
                for w in (confirmed.valid_from..=win).rev() {
                    table[w][current] = Some(confirmed);
                }
            }
        }

        debug!(current, "nearest neighbor row settled");
    }

    let dtw_count = assessments.iter().map(LazyAssessment::dtw_runs).sum();
    let table = table
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|entry| entry.expect("sweep fills every cell"))
                .collect()
        })
        .collect();
    (table, dtw_count)
}
