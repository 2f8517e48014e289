#![allow(clippy::all)] // Clippy will attempt to remove black_box() internals

use criterion::*;
use gridgen::*;
use takeoff_perf::{
    utils::linspace, Fitted1D, PerformanceCalculator, PerformanceRequest, QuadraticSpline1D,
    ReferenceCurve,
};

enum Kind {
    Interp,
    Extrap,
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("QuadraticSpline1D");

    for gridsize in [9, 21, 1000] {
        let curve = gen_curve(gridsize);

        group.throughput(Throughput::Elements(gridsize as u64));
        group.bench_with_input(
            BenchmarkId::new("Fit", gridsize),
            &gridsize,
            |b, _| b.iter(|| black_box(QuadraticSpline1D::fit(&curve).unwrap())),
        );

        let spline = QuadraticSpline1D::fit(&curve).unwrap();
        for (kind, label) in [(Kind::Interp, "Interp"), (Kind::Extrap, "Extrap")] {
            for size in [1, 100, 1_000_000].iter() {
                let obs = gen_obs(curve.grid(), *size, kind_is_extrap(&kind));
                let mut out = vec![0.0; *size];

                group.throughput(Throughput::Elements(*size as u64));
                group.bench_with_input(
                    BenchmarkId::new(format!("Eval {label} {gridsize}-grid"), size),
                    size,
                    |b, _| b.iter(|| black_box(spline.eval(&obs, &mut out).unwrap())),
                );
            }
        }
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let calculator = PerformanceCalculator::embedded().unwrap();
    let requests = gen_requests(1000);

    let mut group = c.benchmark_group("PerformanceCalculator");
    group.throughput(Throughput::Elements(requests.len() as u64));
    group.bench_function("Query with chart", |b| {
        b.iter(|| {
            for r in requests.iter() {
                let _ = black_box(calculator.compute(r));
            }
        })
    });

    let mut config = calculator.config().clone();
    config.chart.enabled = false;
    let no_chart = PerformanceCalculator::new(calculator.tables().clone(), config);
    group.bench_function("Query without chart", |b| {
        b.iter(|| {
            for r in requests.iter() {
                let _ = black_box(no_chart.compute(r));
            }
        })
    });
    group.finish();
}

fn kind_is_extrap(kind: &Kind) -> bool {
    matches!(kind, Kind::Extrap)
}

criterion_group!(benches_fit, bench_fit);
criterion_group!(benches_query, bench_query);
criterion_main!(benches_fit, benches_query,);

mod gridgen {
    use rand::distr::StandardUniform;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::Rng;
    use rand::SeedableRng;

    use super::*;

    /// Fixed random seed to support repeatable benchmarks
    const SEED: [u8; 32] = [
        7, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7,
        6, 5, 4, 3, 2, 1,
    ];

    pub fn rng_fixed_seed() -> StdRng {
        StdRng::from_seed(SEED)
    }

    pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
    where
        StandardUniform: rand::distr::Distribution<T>,
    {
        (0..n).map(|_| rng.random::<T>()).collect()
    }

    // A smooth, decreasing curve with some noise on the samples,
    // shaped like a density-ratio or speed table column.
    pub fn gen_curve(size: usize) -> ReferenceCurve<f64> {
        let mut rng = rng_fixed_seed();
        let grid = linspace(0.0, 100.0, size);
        let noise = randn::<f64>(&mut rng, size);
        let values = grid
            .iter()
            .zip(noise)
            .map(|(&x, n)| 1.3 - 4e-3 * x + 1e-5 * x * x + (n - 0.5) * 1e-4)
            .collect();
        ReferenceCurve::from_values(grid, values).unwrap()
    }

    // Shuffled observation points either inside the sampled domain
    // or just past its upper end.
    pub fn gen_obs(grid: &[f64], size: usize, extrap: bool) -> Vec<f64> {
        let mut rng = rng_fixed_seed();
        let (lo, hi) = (grid[0], grid[grid.len() - 1]);
        let mut obs = if extrap {
            linspace(hi + 1.0, hi + 2.0, size)
        } else {
            linspace(lo, hi, size)
        };
        obs.shuffle(&mut rng);
        obs
    }

    // Queries spread over the tabulated ranges.
    pub fn gen_requests(n: usize) -> Vec<PerformanceRequest> {
        let mut rng = rng_fixed_seed();
        (0..n)
            .map(|_| PerformanceRequest {
                temperature: rng.random_range(0..=120),
                elevation: rng.random_range(0..=8000),
                weight: rng.random_range(34000..=66000),
                runway_length: rng.random_range(4000..=12000),
            })
            .collect()
    }
}
