//! Accuracy regression tests for tempo-search.
//!
//! These tests verify the warping window search against a brute-force
//! leave-one-out evaluation that recomputes every DTW from scratch, and
//! check that the classifier built on the searched window generalizes.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tempo_elastic::{Dtw, Sequence};
use tempo_search::{
    ClassLabel, LazyAssessment, NnClassifier, Refinement, SearchConfig, SequenceStatsCache,
    Verdict,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(values: &[f64]) -> Sequence {
    Sequence::new(values.to_vec()).unwrap()
}

fn random_series(rng: &mut ChaCha8Rng, n: usize, len: usize) -> Vec<Sequence> {
    (0..n)
        .map(|_| {
            let values: Vec<f64> = (0..len).map(|_| rng.gen_range(-2.0..2.0)).collect();
            Sequence::new(values).unwrap()
        })
        .collect()
}

fn alternating_labels(n: usize) -> Vec<ClassLabel> {
    (0..n).map(|i| ClassLabel::new((i % 2) as i64)).collect()
}

/// Leave-one-out nearest-neighbor error at one window, recomputing every
/// distance with the plain rolling kernel.
fn brute_force_loocv_error(series: &[Sequence], labels: &[ClassLabel], window: usize) -> f64 {
    let dtw = Dtw::with_radius(window);
    let mut mistakes = 0usize;
    for i in 0..series.len() {
        let mut nearest = (usize::MAX, f64::INFINITY);
        for (j, other) in series.iter().enumerate() {
            if j == i {
                continue;
            }
            let d = dtw.distance(series[i].as_view(), other.as_view()).value();
            if d < nearest.1 {
                nearest = (j, d);
            }
        }
        if labels[nearest.0] != labels[i] {
            mistakes += 1;
        }
    }
    mistakes as f64 / series.len() as f64
}

// ---------------------------------------------------------------------------
// a) search_matches_brute_force_loocv
// ---------------------------------------------------------------------------

/// The searched error curve, best window, and best error must agree with a
/// brute-force leave-one-out evaluation at every window.
#[test]
fn search_matches_brute_force_loocv() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let series = random_series(&mut rng, 8, 20);
    let labels = alternating_labels(8);

    let result = SearchConfig::new().fit(&series, &labels).unwrap();
    assert_eq!(result.errors.len(), 20, "one error per window 0..len-1");

    let mut expected_best = (usize::MAX, f64::INFINITY);
    for window in 0..20 {
        let expected = brute_force_loocv_error(&series, &labels, window);
        assert!(
            (result.errors[window] - expected).abs() < 1e-12,
            "error at window {window}: got {}, expected {expected}",
            result.errors[window]
        );
        if expected < expected_best.1 {
            expected_best = (window, expected);
        }
    }

    assert_eq!(result.best_window, expected_best.0);
    assert!((result.best_error - expected_best.1).abs() < 1e-12);
    assert!((result.accuracy() - (1.0 - expected_best.1)).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// b) neighbors_agree_with_brute_force_at_best_window
// ---------------------------------------------------------------------------

/// The neighbor table returned for the best window must hold the true
/// nearest neighbor of every sequence at that window.
#[test]
fn neighbors_agree_with_brute_force_at_best_window() {
    let mut rng = ChaCha8Rng::seed_from_u64(901);
    let series = random_series(&mut rng, 7, 16);
    let labels = alternating_labels(7);

    let result = SearchConfig::new().fit(&series, &labels).unwrap();
    assert_eq!(result.neighbors.len(), series.len());

    let dtw = Dtw::with_radius(result.best_window);
    for (i, entry) in result.neighbors.iter().enumerate() {
        let mut nearest = (usize::MAX, f64::INFINITY);
        for (j, other) in series.iter().enumerate() {
            if j == i {
                continue;
            }
            let d = dtw.pruned_squared(series[i].as_view(), other.as_view());
            if d < nearest.1 {
                nearest = (j, d);
            }
        }
        assert_eq!(entry.index, nearest.0, "neighbor of sequence {i}");
        assert!(
            (entry.squared_distance - nearest.1).abs() < 1e-9,
            "distance to neighbor of sequence {i}"
        );
    }
}

// ---------------------------------------------------------------------------
// c) error_ties_resolve_to_the_smallest_window
// ---------------------------------------------------------------------------

/// On well-separated constant classes every window scores zero error, so
/// the search must settle on the narrowest window.
#[test]
fn error_ties_resolve_to_the_smallest_window() {
    let series = vec![
        ts(&[0.0, 0.1, 0.0, 0.1, 0.0]),
        ts(&[0.1, 0.0, 0.1, 0.0, 0.1]),
        ts(&[0.0, 0.0, 0.1, 0.1, 0.0]),
        ts(&[10.0, 10.1, 10.0, 10.1, 10.0]),
        ts(&[10.1, 10.0, 10.1, 10.0, 10.1]),
        ts(&[10.0, 10.0, 10.1, 10.1, 10.0]),
    ];
    let labels: Vec<ClassLabel> = (0..6).map(|i| ClassLabel::new(i64::from(i >= 3))).collect();

    let result = SearchConfig::new().fit(&series, &labels).unwrap();

    assert!(result.errors.iter().all(|&e| e == 0.0));
    assert_eq!(result.best_window, 0, "ties must favor the narrowest window");
    assert_eq!(result.best_error, 0.0);
}

// ---------------------------------------------------------------------------
// d) pruned_refinements_reproduce_the_default_search
// ---------------------------------------------------------------------------

/// Switching the exact-refinement kernel must not change any reported
/// error, window, or neighbor distance.
#[test]
fn pruned_refinements_reproduce_the_default_search() {
    let mut rng = ChaCha8Rng::seed_from_u64(5150);
    let series = random_series(&mut rng, 8, 14);
    let labels = alternating_labels(8);

    let default_run = SearchConfig::new().fit(&series, &labels).unwrap();

    for refinement in [Refinement::Pruned, Refinement::PrunedWithSeed] {
        let pruned_run = SearchConfig::new()
            .with_refinement(refinement)
            .fit(&series, &labels)
            .unwrap();

        assert_eq!(pruned_run.best_window, default_run.best_window, "{refinement:?}");
        assert_eq!(pruned_run.errors.len(), default_run.errors.len());
        for (w, (a, b)) in pruned_run.errors.iter().zip(&default_run.errors).enumerate() {
            assert!((a - b).abs() < 1e-12, "{refinement:?}: errors diverge at window {w}");
        }
        for (i, (a, b)) in pruned_run
            .neighbors
            .iter()
            .zip(&default_run.neighbors)
            .enumerate()
        {
            assert_eq!(a.index, b.index, "{refinement:?}: neighbor of sequence {i}");
            assert!(
                (a.squared_distance - b.squared_distance).abs() < 1e-9,
                "{refinement:?}: neighbor distance of sequence {i}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// e) max_window_fraction_caps_the_sweep
// ---------------------------------------------------------------------------

/// A window-fraction cap must bound both the error curve and the chosen
/// window.
#[test]
fn max_window_fraction_caps_the_sweep() {
    let mut rng = ChaCha8Rng::seed_from_u64(33);
    // Length 16 at fraction 0.25 caps the sweep at radius 4 exactly.
    let series = random_series(&mut rng, 6, 16);
    let labels = alternating_labels(6);

    let result = SearchConfig::new()
        .with_max_window_fraction(0.25)
        .fit(&series, &labels)
        .unwrap();

    assert_eq!(result.errors.len(), 5, "windows 0..=4");
    assert!(result.best_window <= 4);

    for window in 0..=4 {
        let expected = brute_force_loocv_error(&series, &labels, window);
        assert!((result.errors[window] - expected).abs() < 1e-12);
    }
}

// ---------------------------------------------------------------------------
// f) searched_window_classifies_held_out_queries
// ---------------------------------------------------------------------------

/// End to end: search the window on a train split, classify a separable
/// test split at that window, and demand perfect accuracy.
#[test]
fn searched_window_classifies_held_out_queries() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let len = 24;
    let make = |base: f64, rng: &mut ChaCha8Rng| {
        let values: Vec<f64> = (0..len)
            .map(|t| base + (t as f64 * 0.5).sin() + rng.gen_range(-0.2..0.2))
            .collect();
        Sequence::new(values).unwrap()
    };

    let mut train = Vec::new();
    let mut train_labels = Vec::new();
    for _ in 0..4 {
        train.push(make(0.0, &mut rng));
        train_labels.push(ClassLabel::new(0));
        train.push(make(6.0, &mut rng));
        train_labels.push(ClassLabel::new(1));
    }

    let search = SearchConfig::new().fit(&train, &train_labels).unwrap();
    assert_eq!(search.best_error, 0.0, "train split is separable");

    let classifier = NnClassifier::new(&train, &train_labels, search.best_window).unwrap();
    let queries = vec![
        make(0.0, &mut rng),
        make(6.0, &mut rng),
        make(0.0, &mut rng),
        make(6.0, &mut rng),
    ];
    let truth = vec![
        ClassLabel::new(0),
        ClassLabel::new(1),
        ClassLabel::new(0),
        ClassLabel::new(1),
    ];

    let outcome = classifier.evaluate(&queries, &truth).unwrap();
    assert_eq!(outcome.n_correct, 4);
    assert!((outcome.accuracy() - 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// g) dtw_count_stays_below_the_naive_budget
// ---------------------------------------------------------------------------

/// The search must spend fewer exact DTW calls than the naive sweep that
/// evaluates every pair at every window.
#[test]
fn dtw_count_stays_below_the_naive_budget() {
    let mut rng = ChaCha8Rng::seed_from_u64(64);
    let n = 10;
    let len = 24;
    let series = random_series(&mut rng, n, len);
    let labels = alternating_labels(n);

    let result = SearchConfig::new().fit(&series, &labels).unwrap();

    let n_pairs = n * (n - 1) / 2;
    let naive = n_pairs * len;
    assert!(
        result.dtw_count < naive,
        "dtw_count {} should undercut the naive budget {naive}",
        result.dtw_count
    );
    assert!(result.dtw_count >= n - 1, "every sequence needs a neighbor");
}

// ---------------------------------------------------------------------------
// h) kim_floor_lower_bounds_the_warped_distance
// ---------------------------------------------------------------------------

/// The LB_Kim floor is window-independent, so it must lower-bound the exact
/// squared distance at every radius, from locked-step to unconstrained.
#[test]
fn kim_floor_lower_bounds_the_warped_distance() {
    let mut rng = ChaCha8Rng::seed_from_u64(4242);
    let len = 20;

    for round in 0..50 {
        let series = random_series(&mut rng, 2, len);
        let cache = SequenceStatsCache::new(&series);
        let kim = LazyAssessment::new(0, 1, &cache).best_bound_squared();

        for window in [0, 1, len / 2, len - 1] {
            let exact = Dtw::with_radius(window)
                .pruned_squared(series[0].as_view(), series[1].as_view());
            assert!(
                kim <= exact + 1e-9,
                "round {round}, window {window}: Kim floor {kim} exceeds exact {exact}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// i) cascade_bound_never_decreases
// ---------------------------------------------------------------------------

/// Driving a pair with non-decreasing thresholds at a fixed window must
/// yield a non-decreasing best bound: evidence accumulates and is never
/// thrown away, and the largest threshold forces refinement to the exact
/// distance.
#[test]
fn cascade_bound_never_decreases() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let len = 16;
    let window = 4;

    for round in 0..20 {
        let series = random_series(&mut rng, 2, len);
        let mut cache = SequenceStatsCache::new(&series);
        let exact = Dtw::with_radius(window)
            .pruned_squared(series[0].as_view(), series[1].as_view());

        let mut assessment = LazyAssessment::new(0, 1, &cache);
        let mut previous = assessment.best_bound_squared();
        for score in [exact * 0.2, exact * 0.6, exact * 0.99, exact * 1.5] {
            assessment.try_to_beat(&mut cache, window, score, Refinement::Windowed);
            let bound = assessment.best_bound_squared();
            assert!(
                bound >= previous,
                "round {round}: bound regressed from {previous} to {bound}"
            );
            previous = bound;
        }

        assert_eq!(
            assessment.try_to_beat(&mut cache, window, exact * 1.5, Refinement::Windowed),
            Verdict::NewBest
        );
        assert!((assessment.squared_distance_at(window) - exact).abs() < 1e-9);
    }
}
