//! Warping window constraints for DTW.

/// A Sakoe-Chiba warping window constraint on the DTW alignment.
///
/// The constraint restricts which cells `(i, j)` of the cost matrix an
/// alignment path may visit. [`WarpingWindow::Radius`] admits exactly the
/// cells with `|i - j| <= radius` (inclusive); [`WarpingWindow::Unconstrained`]
/// admits every cell.
///
/// A radius of 0 forces the locked-step diagonal alignment; a radius at least
/// as large as the longer sequence behaves identically to `Unconstrained`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarpingWindow {
    /// No constraint: every cell of the cost matrix is admissible.
    #[default]
    Unconstrained,
    /// Sakoe-Chiba band: cell `(i, j)` is admissible iff `|i - j| <= radius`.
    Radius(usize),
}

impl WarpingWindow {
    /// Return the effective band radius for sequences of length `n` and `m`.
    ///
    /// `Unconstrained` maps to `max(n, m)`, which admits every cell.
    #[must_use]
    pub fn effective_radius(self, n: usize, m: usize) -> usize {
        match self {
            WarpingWindow::Unconstrained => n.max(m),
            WarpingWindow::Radius(radius) => radius,
        }
    }

    /// Return the half-open range `[start, end)` of admissible columns in row
    /// `row`, for a cost matrix with `n_cols` columns.
    #[must_use]
    pub fn column_range(self, row: usize, n_cols: usize) -> (usize, usize) {
        match self {
            WarpingWindow::Unconstrained => (0, n_cols),
            WarpingWindow::Radius(radius) => {
                let start = row.saturating_sub(radius);
                let end = (row + radius + 1).min(n_cols);
                (start, end)
            }
        }
    }

    /// Return the maximum number of admissible columns in any row, for a cost
    /// matrix with `n_cols` columns.
    #[must_use]
    pub fn band_width(self, n_cols: usize) -> usize {
        match self {
            WarpingWindow::Unconstrained => n_cols,
            WarpingWindow::Radius(radius) => (2 * radius + 1).min(n_cols),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unconstrained() {
        assert_eq!(WarpingWindow::default(), WarpingWindow::Unconstrained);
    }

    #[test]
    fn unconstrained_covers_all_columns() {
        let w = WarpingWindow::Unconstrained;
        assert_eq!(w.column_range(0, 10), (0, 10));
        assert_eq!(w.column_range(7, 10), (0, 10));
        assert_eq!(w.band_width(10), 10);
    }

    #[test]
    fn radius_clips_at_left_edge() {
        let w = WarpingWindow::Radius(2);
        assert_eq!(w.column_range(0, 10), (0, 3));
        assert_eq!(w.column_range(1, 10), (0, 4));
    }

    #[test]
    fn radius_clips_at_right_edge() {
        let w = WarpingWindow::Radius(2);
        assert_eq!(w.column_range(9, 10), (7, 10));
        assert_eq!(w.column_range(8, 10), (6, 10));
    }

    #[test]
    fn radius_interior_is_symmetric() {
        let w = WarpingWindow::Radius(2);
        assert_eq!(w.column_range(5, 10), (3, 8));
    }

    #[test]
    fn radius_zero_is_diagonal_only() {
        let w = WarpingWindow::Radius(0);
        assert_eq!(w.column_range(4, 10), (4, 5));
        assert_eq!(w.band_width(10), 1);
    }

    #[test]
    fn band_width_caps_at_column_count() {
        let w = WarpingWindow::Radius(50);
        assert_eq!(w.band_width(10), 10);
    }

    #[test]
    fn effective_radius_for_unconstrained_covers_everything() {
        assert_eq!(WarpingWindow::Unconstrained.effective_radius(8, 12), 12);
        assert_eq!(WarpingWindow::Radius(3).effective_radius(8, 12), 3);
    }
}
