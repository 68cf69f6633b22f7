//! Dynamic time warping under a Sakoe-Chiba window.
//!
//! The kernel accumulates squared differences and takes the square root once
//! at the public boundary. Costs are computed over a rolling pair of band-wide
//! row buffers rather than a full matrix, with an infinity sentinel one cell
//! to the left of each row's band, so memory is O(band) and each call owns its
//! scratch space (concurrent calls on independent pairs are safe).

use crate::distance::Distance;
use crate::series::SequenceView;
use crate::window::WarpingWindow;

/// DTW distance engine for a fixed warping window.
#[derive(Debug, Clone, Copy)]
pub struct Dtw {
    window: WarpingWindow,
}

/// Exact squared DTW distance plus the width of the optimal alignment path.
///
/// `path_width` is the maximum `|i - j|` visited by the optimal path, so the
/// squared distance stays exactly correct for any window radius in
/// `path_width..=w`, where `w` is the radius the value was computed at:
/// narrowing the window down to `path_width` cannot exclude the path, and the
/// windowed distance is non-increasing in the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DtwDetails {
    /// The squared accumulated cost of the optimal alignment.
    pub squared_distance: f64,
    /// Maximum `|i - j|` over the optimal alignment path.
    pub path_width: usize,
}

impl DtwDetails {
    /// Return the distance in root space.
    #[must_use]
    pub fn distance(&self) -> Distance {
        Distance::new(self.squared_distance.sqrt())
    }
}

impl Dtw {
    /// Create an engine for the given warping window.
    #[must_use]
    pub fn new(window: WarpingWindow) -> Self {
        Self { window }
    }

    /// Create an engine with no warping constraint.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self::new(WarpingWindow::Unconstrained)
    }

    /// Create an engine with a Sakoe-Chiba band of the given radius.
    #[must_use]
    pub fn with_radius(radius: usize) -> Self {
        Self::new(WarpingWindow::Radius(radius))
    }

    /// Return the configured warping window.
    #[must_use]
    pub fn window(&self) -> WarpingWindow {
        self.window
    }

    /// Compute the DTW distance between `a` and `b`.
    ///
    /// Unequal lengths are allowed. If the band is too narrow to reach the
    /// final cell (radius smaller than the length difference), no admissible
    /// alignment exists and the result is [`Distance::INFINITY`].
    #[must_use]
    pub fn distance(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Distance {
        Distance::new(self.rolling_squared(a.values(), b.values(), None).sqrt())
    }

    /// Compute the DTW distance, abandoning early once it provably exceeds
    /// `cutoff`.
    ///
    /// `cutoff` is in root space. Returns the exact distance when it is at
    /// most `cutoff`, and [`Distance::INFINITY`] otherwise. Abandonment checks
    /// the minimum of each completed row, which can only grow as rows advance;
    /// the last row is decided by the final cell alone.
    #[must_use]
    pub fn distance_with_cutoff(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        cutoff: f64,
    ) -> Distance {
        let cutoff_squared = cutoff * cutoff;
        Distance::new(
            self.rolling_squared(a.values(), b.values(), Some(cutoff_squared))
                .sqrt(),
        )
    }

    /// Compute the exact squared DTW distance together with the optimal
    /// path's width.
    ///
    /// Tracks, per cell, the maximum `|i - j|` along the path that realizes
    /// the cell's cost. Ties between predecessors are broken in favor of the
    /// diagonal, then the left, then the above cell, so identical sequences
    /// always report a path width of 0.
    #[must_use]
    pub fn details(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> DtwDetails {
        let av = a.values();
        let bv = b.values();
        let n = av.len();
        let m = bv.len();
        let buf_width = self.window.band_width(m) + 2;

        let mut prev = vec![f64::INFINITY; buf_width];
        let mut curr = vec![f64::INFINITY; buf_width];
        let mut prev_width = vec![0usize; buf_width];
        let mut curr_width = vec![0usize; buf_width];

        // Row 0 is the cumulative locked scan along the band prefix.
        let (_, end) = self.window.column_range(0, m);
        let mut running = 0.0;
        for j in 0..end {
            let d = av[0] - bv[j];
            running += d * d;
            curr[j + 1] = running;
            curr_width[j + 1] = j;
        }
        let mut curr_start = 0usize;
        let mut curr_end = end;

        for i in 1..n {
            std::mem::swap(&mut prev, &mut curr);
            std::mem::swap(&mut prev_width, &mut curr_width);
            let prev_start = curr_start;
            let (start, end) = self.window.column_range(i, m);
            curr_start = start;
            curr_end = end;
            curr.fill(f64::INFINITY);

            for j in start..end {
                let cj = j - start + 1;
                let pj = j + 1 - prev_start;
                let left = curr[cj - 1];
                let above = prev[pj];
                let diag = prev[pj - 1];

                // Ties prefer diagonal, then left, then above.
                let (pred, pred_width) = if diag <= left && diag <= above {
                    (diag, prev_width[pj - 1])
                } else if left <= above {
                    (left, curr_width[cj - 1])
                } else {
                    (above, prev_width[pj])
                };

                let d = av[i] - bv[j];
                curr[cj] = pred + d * d;
                curr_width[cj] = i.abs_diff(j).max(pred_width);
            }
        }

        if m - 1 < curr_start || m - 1 >= curr_end {
            return DtwDetails {
                squared_distance: f64::INFINITY,
                path_width: 0,
            };
        }
        let last = (m - 1) - curr_start + 1;
        DtwDetails {
            squared_distance: curr[last],
            path_width: curr_width[last],
        }
    }

    /// Rolling two-row DP in squared space.
    ///
    /// Returns the squared distance, or `f64::INFINITY` when the band never
    /// reaches the final cell or the cutoff abandons the computation.
    fn rolling_squared(&self, av: &[f64], bv: &[f64], cutoff_squared: Option<f64>) -> f64 {
        let n = av.len();
        let m = bv.len();
        let buf_width = self.window.band_width(m) + 2;

        let mut prev = vec![f64::INFINITY; buf_width];
        let mut curr = vec![f64::INFINITY; buf_width];

        let (_, end) = self.window.column_range(0, m);
        let mut running = 0.0;
        for j in 0..end {
            let d = av[0] - bv[j];
            running += d * d;
            curr[j + 1] = running;
        }
        let mut curr_start = 0usize;
        let mut curr_end = end;

        for i in 1..n {
            std::mem::swap(&mut prev, &mut curr);
            let prev_start = curr_start;
            let (start, end) = self.window.column_range(i, m);
            curr_start = start;
            curr_end = end;
            curr.fill(f64::INFINITY);
            let mut row_min = f64::INFINITY;

            for j in start..end {
                let cj = j - start + 1;
                let pj = j + 1 - prev_start;
                let left = curr[cj - 1];
                let above = prev[pj];
                let diag = prev[pj - 1];
                let d = av[i] - bv[j];
                let cost = diag.min(left).min(above) + d * d;
                curr[cj] = cost;
                if cost < row_min {
                    row_min = cost;
                }
            }

            // The final cell decides on its own, so never abandon the last row.
            if let Some(c) = cutoff_squared
                && i < n - 1
                && row_min > c
            {
                return f64::INFINITY;
            }
        }

        if m - 1 < curr_start || m - 1 >= curr_end {
            return f64::INFINITY;
        }
        let total = curr[(m - 1) - curr_start + 1];
        if let Some(c) = cutoff_squared
            && total > c
        {
            return f64::INFINITY;
        }
        total
    }
}
