//! Configuration builder for the warping window search.

use tempo_elastic::Sequence;

use crate::error::SearchError;
use crate::label::ClassLabel;
use crate::result::WindowSearchResult;

/// Kernel used when the cascade must refine a pair to an exact distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refinement {
    /// Path-tracking windowed DTW. The slowest kernel per call, but it also
    /// yields the alignment path width, so the result stays reusable at
    /// every narrower radius the path fits in.
    #[default]
    Windowed,
    /// Cell-pruned DTW with its built-in adaptive row bound. Cheaper per
    /// call; the result is only known to be exact at the radius it was
    /// computed at.
    Pruned,
    /// Cell-pruned DTW seeded with the pair's locked-step distance as the
    /// pruning bound. The tightest cell pruning of the three; same
    /// single-radius validity as [`Refinement::Pruned`].
    PrunedWithSeed,
}

/// Configuration for the warping window search.
///
/// Construct via [`SearchConfig::new`], then chain `with_*` methods to
/// override defaults.
///
/// # Defaults
///
/// | Parameter             | Default                |
/// |-----------------------|------------------------|
/// | `max_window_fraction` | 1.0 (full sweep)       |
/// | `refinement`          | [`Refinement::Windowed`] |
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub(crate) max_window_fraction: f64,
    pub(crate) refinement: Refinement,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_window_fraction: 1.0,
            refinement: Refinement::Windowed,
        }
    }
}

impl SearchConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the searched radii at the given fraction of the sequence length,
    /// in `(0, 1]`. The cap never exceeds `sequence length - 1`, since that
    /// radius already admits every alignment.
    #[must_use]
    pub fn with_max_window_fraction(mut self, fraction: f64) -> Self {
        self.max_window_fraction = fraction;
        self
    }

    /// Choose the exact-refinement kernel.
    #[must_use]
    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = refinement;
        self
    }

    /// Return the configured window fraction.
    #[must_use]
    pub fn max_window_fraction(&self) -> f64 {
        self.max_window_fraction
    }

    /// Return the configured refinement kernel.
    #[must_use]
    pub fn refinement(&self) -> Refinement {
        self.refinement
    }

    /// Largest radius the sweep will visit for sequences of length `len`.
    pub(crate) fn resolved_max_window(&self, len: usize) -> usize {
        let capped = (len as f64 * self.max_window_fraction).floor() as usize;
        capped.min(len - 1)
    }

    /// Find the warping window radius with the lowest leave-one-out
    /// nearest-neighbor error on a labeled training set.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SearchError::InvalidWindowFraction`] | fraction outside `(0, 1]` |
    /// | [`SearchError::TooFewSequences`] | fewer than 2 sequences |
    /// | [`SearchError::LabelCountMismatch`] | `labels.len() != series.len()` |
    /// | [`SearchError::UnequalLengths`] | a sequence length differs from the first |
    pub fn fit(
        &self,
        series: &[Sequence],
        labels: &[ClassLabel],
    ) -> Result<WindowSearchResult, SearchError> {
        if !(self.max_window_fraction > 0.0 && self.max_window_fraction <= 1.0) {
            return Err(SearchError::InvalidWindowFraction {
                fraction: self.max_window_fraction,
            });
        }
        if series.len() < 2 {
            return Err(SearchError::TooFewSequences {
                n_sequences: series.len(),
            });
        }
        if labels.len() != series.len() {
            return Err(SearchError::LabelCountMismatch {
                n_labels: labels.len(),
                n_sequences: series.len(),
            });
        }
        let expected = series[0].len();
        for (index, s) in series.iter().enumerate() {
            if s.len() != expected {
                return Err(SearchError::UnequalLengths {
                    index,
                    len: s.len(),
                    expected,
                });
            }
        }
        Ok(crate::fastwws::search(series, labels, self))
    }
}

#[cfg(test)]
mod tests {
    use super::{Refinement, SearchConfig};
    use crate::error::SearchError;
    use crate::label::ClassLabel;
    use tempo_elastic::Sequence;

    fn seq(values: &[f64]) -> Sequence {
        Sequence::new(values.to_vec()).unwrap()
    }

    #[test]
    fn defaults() {
        let config = SearchConfig::new();
        assert_eq!(config.max_window_fraction(), 1.0);
        assert_eq!(config.refinement(), Refinement::Windowed);
    }

    #[test]
    fn builder_chaining() {
        let config = SearchConfig::new()
            .with_max_window_fraction(0.25)
            .with_refinement(Refinement::PrunedWithSeed);
        assert_eq!(config.max_window_fraction(), 0.25);
        assert_eq!(config.refinement(), Refinement::PrunedWithSeed);
    }

    #[test]
    fn resolved_max_window_floors_and_clamps() {
        let config = SearchConfig::new().with_max_window_fraction(0.25);
        assert_eq!(config.resolved_max_window(16), 4);

        let full = SearchConfig::new();
        assert_eq!(full.resolved_max_window(16), 15, "full sweep clamps to len - 1");
        assert_eq!(full.resolved_max_window(1), 0);
    }

    #[test]
    fn fit_rejects_window_fraction_outside_unit_interval() {
        let series = vec![seq(&[1.0, 2.0]), seq(&[2.0, 3.0])];
        let labels = vec![ClassLabel::new(0), ClassLabel::new(1)];

        for fraction in [0.0, -0.5, 1.5, f64::NAN] {
            let result = SearchConfig::new()
                .with_max_window_fraction(fraction)
                .fit(&series, &labels);
            assert!(
                matches!(result, Err(SearchError::InvalidWindowFraction { .. })),
                "fraction {fraction} should be rejected"
            );
        }
    }

    #[test]
    fn fit_rejects_single_sequence() {
        let series = vec![seq(&[1.0, 2.0])];
        let labels = vec![ClassLabel::new(0)];
        let result = SearchConfig::new().fit(&series, &labels);
        assert!(matches!(
            result,
            Err(SearchError::TooFewSequences { n_sequences: 1 })
        ));
    }

    #[test]
    fn fit_rejects_label_mismatch() {
        let series = vec![seq(&[1.0, 2.0]), seq(&[2.0, 3.0])];
        let labels = vec![ClassLabel::new(0)];
        let result = SearchConfig::new().fit(&series, &labels);
        assert!(matches!(
            result,
            Err(SearchError::LabelCountMismatch {
                n_labels: 1,
                n_sequences: 2
            })
        ));
    }

    #[test]
    fn fit_rejects_unequal_lengths() {
        let series = vec![seq(&[1.0, 2.0]), seq(&[2.0, 3.0, 4.0])];
        let labels = vec![ClassLabel::new(0), ClassLabel::new(1)];
        let result = SearchConfig::new().fit(&series, &labels);
        assert!(matches!(
            result,
            Err(SearchError::UnequalLengths {
                index: 1,
                len: 3,
                expected: 2
            })
        ));
    }
}
