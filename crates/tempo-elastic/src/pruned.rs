//! Pruned DTW: the exact windowed distance with upper-bound cell pruning.
//!
//! The full cost matrix is materialized, but each row only scans the columns
//! that can still lie on a path cheaper than an upper bound on the final
//! distance. Cells above the bound shrink the next row's scan from the left
//! (until the first surviving cell) and trigger a break past the previous
//! row's last surviving column. Skipped cells stay at infinity, which also
//! subsumes the usual left-only recurrence beyond the previous row's reach.
//!
//! The bound is either supplied by the caller or derived per row from the
//! locked-step alignment: the best path through diagonal cell `(i, i)` plus
//! the locked-step cost of the remaining suffix is always achievable, so it
//! bounds the final distance. The derived bound keeps every diagonal cell
//! alive, which makes the adaptive variant exact for any input.

use crate::distance::Distance;
use crate::dtw::Dtw;
use crate::series::SequenceView;

impl Dtw {
    /// Compute the exact squared windowed DTW distance with adaptive pruning.
    ///
    /// Requires equal-length sequences (the adaptive bound follows the
    /// diagonal) and panics otherwise.
    #[must_use]
    pub fn pruned_squared(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> f64 {
        self.pruned(a, b, None)
    }

    /// Compute the squared windowed DTW distance, pruning against a caller
    /// supplied bound in squared space.
    ///
    /// If `upper_bound` really bounds the squared windowed distance from
    /// above, the result is exact. With an invalid bound the result may
    /// overestimate the true distance (possibly reaching infinity), but it
    /// never underestimates it. Requires equal-length sequences.
    #[must_use]
    pub fn pruned_squared_with_bound(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        upper_bound: f64,
    ) -> f64 {
        self.pruned(a, b, Some(upper_bound))
    }

    /// [`Dtw::pruned_squared`] in root space.
    #[must_use]
    pub fn distance_pruned(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Distance {
        Distance::new(self.pruned_squared(a, b).sqrt())
    }

    fn pruned(&self, a: SequenceView<'_>, b: SequenceView<'_>, upper_bound: Option<f64>) -> f64 {
        let av = a.values();
        let bv = b.values();
        let n = av.len();
        let m = bv.len();
        assert_eq!(n, m, "pruned DTW requires equal-length sequences");
        let radius = self.window().effective_radius(n, m);

        // ub_partials[i] is the squared locked-step cost of aligning the
        // suffixes a[i..] and b[i..].
        let mut ub_partials = vec![0.0; n + 1];
        for i in (0..n).rev() {
            let d = av[i] - bv[i];
            ub_partials[i] = ub_partials[i + 1] + d * d;
        }

        // One-indexed (n + 1) x (m + 1) matrix with an infinity border; only
        // cell (0, 0) is reachable at cost zero.
        let stride = m + 1;
        let mut cost = vec![f64::INFINITY; (n + 1) * stride];
        cost[0] = 0.0;

        let mut sc = 1_usize;
        let mut ec = 1_usize;
        let mut ec_next = 1_usize;

        for i in 1..=n {
            let row_bound = match upper_bound {
                Some(ub) => ub,
                None => ub_partials[i - 1] + cost[(i - 1) * stride + (i - 1)],
            };
            let j_start = sc.max(i.saturating_sub(radius));
            let j_stop = (i + radius).min(m);
            let mut found_lower = false;

            for j in j_start..=j_stop {
                let idx = i * stride + j;
                let diag = cost[idx - stride - 1];
                let left = cost[idx - 1];
                let above = cost[idx - stride];
                let d = av[i - 1] - bv[j - 1];
                let c = diag.min(left).min(above) + d * d;
                cost[idx] = c;

                if c > row_bound {
                    if !found_lower {
                        sc = j + 1;
                    }
                    if j > ec {
                        break;
                    }
                } else {
                    found_lower = true;
                    ec_next = j;
                }
            }

            ec_next += 1;
            ec = ec_next;
        }

        cost[n * stride + m]
    }
}
