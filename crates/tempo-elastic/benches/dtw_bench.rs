//! Criterion benchmarks for tempo-elastic: windowed DTW, early abandoning, pruning, and LB_Keogh.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use tempo_elastic::{Dtw, Envelope, Sequence, WarpingWindow, lb_keogh_squared};

fn make_sine_series(n: usize, offset: f64) -> Sequence {
    let values: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin() + offset).collect();
    Sequence::new(values).unwrap()
}

fn bench_dtw_distance(c: &mut Criterion) {
    let lengths = [64usize, 256, 1024];
    let windows: &[(WarpingWindow, &str)] = &[
        (WarpingWindow::Unconstrained, "unconstrained"),
        (WarpingWindow::Radius(2), "radius2"),
        (WarpingWindow::Radius(10), "radius10"),
    ];

    let mut group = c.benchmark_group("dtw_distance");

    for &len in &lengths {
        for &(window, window_label) in windows {
            let id = BenchmarkId::new(format!("len{len}"), window_label);
            let a = make_sine_series(len, 0.0);
            let b = make_sine_series(len, 1.0);
            let dtw = Dtw::new(window);

            group.bench_with_input(id, &(a, b, dtw), |bencher, (a, b, dtw)| {
                bencher.iter(|| dtw.distance(a.as_view(), b.as_view()));
            });
        }
    }

    group.finish();
}

fn bench_dtw_cutoff(c: &mut Criterion) {
    let a = make_sine_series(1024, 0.0);
    let b = make_sine_series(1024, 1.0);
    let dtw = Dtw::with_radius(10);
    let exact = dtw.distance(a.as_view(), b.as_view()).value();

    let mut group = c.benchmark_group("dtw_cutoff");
    for &(factor, label) in &[(1.05, "loose"), (0.5, "tight")] {
        let cutoff = exact * factor;
        group.bench_function(label, |bencher| {
            bencher.iter(|| dtw.distance_with_cutoff(a.as_view(), b.as_view(), cutoff));
        });
    }
    group.finish();
}

fn bench_dtw_pruned(c: &mut Criterion) {
    let a = make_sine_series(1024, 0.0);
    let b = make_sine_series(1024, 1.0);
    let dtw = Dtw::with_radius(10);

    c.bench_function("dtw_pruned_1024_r10", |bencher| {
        bencher.iter(|| dtw.pruned_squared(a.as_view(), b.as_view()));
    });
}

fn bench_lb_keogh(c: &mut Criterion) {
    let a = make_sine_series(1024, 0.0);
    let b = make_sine_series(1024, 1.0);
    let window = WarpingWindow::Radius(10);
    let envelope = Envelope::compute(b.as_view(), window);

    c.bench_function("envelope_1024_r10", |bencher| {
        bencher.iter(|| Envelope::compute(b.as_view(), window));
    });
    c.bench_function("lb_keogh_1024_r10", |bencher| {
        bencher.iter(|| lb_keogh_squared(a.as_view(), &envelope));
    });
}

criterion_group!(
    benches,
    bench_dtw_distance,
    bench_dtw_cutoff,
    bench_dtw_pruned,
    bench_lb_keogh
);
criterion_main!(benches);
