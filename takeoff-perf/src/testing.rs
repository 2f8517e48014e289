//! Seeded generators for reference curves and fit samples.

use rand::distr::StandardUniform;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::curve::ReferenceCurve;
use crate::utils::linspace;

const SEED: [u8; 32] = [
    7, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Generator with a fixed seed, so every run draws the same tables
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// `n` draws in [0, 1)
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    (0..n).map(|_| rng.random::<T>()).collect()
}

/// `n` draws spread over [lo, hi]
pub fn uniform(rng: &mut StdRng, lo: f64, hi: f64, n: usize) -> Vec<f64> {
    randn::<f64>(rng, n)
        .into_iter()
        .map(|u| lo + (hi - lo) * u)
        .collect()
}

/// Evenly spaced grid over [lo, hi] with every interior point moved by up to
/// `jitter` either way. The ends stay put and the grid stays increasing as
/// long as `jitter` is under half the spacing.
pub fn jittered_linspace(rng: &mut StdRng, lo: f64, hi: f64, n: usize, jitter: f64) -> Vec<f64> {
    let mut grid = linspace(lo, hi, n);
    let last = grid.len().saturating_sub(1);
    for (i, x) in grid.iter_mut().enumerate() {
        if i != 0 && i != last {
            *x += jitter * (2.0 * rng.random::<f64>() - 1.0);
        }
    }
    grid
}

/// `n` strictly increasing samples with uneven steps
pub fn monotone_samples(rng: &mut StdRng, n: usize) -> Vec<f64> {
    randn::<f64>(rng, n)
        .into_iter()
        .scan(0.0, |acc, u| {
            *acc += 1e-3 + u * u;
            Some(*acc)
        })
        .collect()
}

/// A speed-like curve over the runway-length grid, with no-data at `holes`
pub fn curve_with_holes(rng: &mut StdRng, n: usize, holes: &[usize]) -> ReferenceCurve<f64> {
    let grid = linspace(4000.0, 12000.0, n);
    let samples = randn::<f64>(rng, n)
        .into_iter()
        .enumerate()
        .map(|(i, y)| (!holes.contains(&i)).then_some(80.0 + 60.0 * y))
        .collect();
    // Grid is increasing by construction
    ReferenceCurve::new(grid, samples).unwrap()
}
