//! Shape-preserving piecewise-quadratic interpolating spline.
//!
//! The spline passes through every defined sample and has a continuous first
//! derivative. Each interior sample gets a slope from the secants on either
//! side: their harmonic mean when both have the same sign, and zero at a local
//! extremum of the data. End slopes come from the three-point formula, kept on
//! the side of the end secant and within twice its size. Every interval is
//! covered by two quadratic pieces that meet at an interior knot placed as in
//! Schumaker (1983), so the spline is monotone wherever the data is, and on
//! each interval stays between the two samples that bound it.
//!
//! Outside the samples, each end continues as a quadratic with the end slope
//! and the mean curvature of the end interval. Past the vertex of that
//! quadratic the continuation holds level, so extrapolation never turns back
//! against the trend of the data.
//!
//! ```rust
//! use takeoff_perf::curve::ReferenceCurve;
//! use takeoff_perf::fit::{Fitted1D, QuadraticSpline1D};
//!
//! let curve = ReferenceCurve::from_values(
//!     vec![-60.0_f64, -50.0, -40.0, -30.0],
//!     vec![1.30, 1.27, 1.23, 1.20],
//! ).unwrap();
//! let spline = QuadraticSpline1D::fit(&curve).unwrap();
//!
//! assert_eq!(spline.eval_one(-40.0), 1.23);
//! let dr = spline.eval_one(-45.0);
//! assert!(1.23 < dr && dr < 1.27);
//! assert!(spline.eval_one(-20.0) < 1.20);
//! ```
use num_traits::Float;

use super::Fitted1D;
use crate::curve::ReferenceCurve;
use crate::error::PerformanceError;

/// Minimum number of defined samples needed to build a fit
pub const MIN_SAMPLES: usize = 2;

/// One quadratic piece, stored relative to its left knot
#[derive(Debug, Clone, Copy)]
struct Piece<T> {
    x0: T,
    y0: T,
    slope: T,
    curvature: T,
}

impl<T: Float> Piece<T> {
    /// Value at offset `dx` from the knot, in Horner form
    #[inline]
    fn at(&self, dx: T) -> T {
        self.y0 + dx * (self.slope + dx * self.curvature)
    }

    #[inline]
    fn slope_at(&self, dx: T) -> T {
        self.slope + (self.curvature + self.curvature) * dx
    }
}

/// Quadratic continuation past one end of the samples.
#[derive(Debug, Clone, Copy)]
struct Tail<T> {
    piece: Piece<T>,
    /// Offsets from the end sample over which the quadratic is followed
    reach: (T, T),
}

impl<T: Float> Tail<T> {
    fn new(piece: Piece<T>, upper: bool) -> Self {
        let (zero, inf) = (T::zero(), T::infinity());
        let mut reach = if upper { (zero, inf) } else { (-inf, zero) };

        if piece.curvature != zero {
            let vertex = -piece.slope / (piece.curvature + piece.curvature);
            if upper && vertex >= zero {
                reach.1 = vertex;
            } else if !upper && vertex <= zero {
                reach.0 = vertex;
            }
        }

        Self { piece, reach }
    }

    #[inline]
    fn value(&self, x: T) -> T {
        let dx = (x - self.piece.x0).max(self.reach.0).min(self.reach.1);
        self.piece.at(dx)
    }

    #[inline]
    fn derivative(&self, x: T) -> T {
        let raw = x - self.piece.x0;
        let dx = raw.max(self.reach.0).min(self.reach.1);
        if dx == raw {
            self.piece.slope_at(dx)
        } else {
            T::zero()
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuadraticSpline1D<T: Float> {
    pieces: Vec<Piece<T>>,
    lower: Tail<T>,
    upper: Tail<T>,
}

impl<T: Float> QuadraticSpline1D<T> {
    /// Fit through the defined samples of `curve`, skipping no-data points.
    ///
    /// # Errors
    /// * `InsufficientSamples` if fewer than two samples carry data
    pub fn fit(curve: &ReferenceCurve<T>) -> Result<Self, PerformanceError> {
        let (xs, ys): (Vec<T>, Vec<T>) = curve.defined_points().unzip();
        Self::new(&xs, &ys)
    }

    /// Fit through explicit points.
    ///
    /// # Errors
    /// * `MismatchedGrid` if `xs` and `ys` differ in length
    /// * `InsufficientSamples` if there are fewer than two points
    /// * `Table` if `xs` is not strictly increasing
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, PerformanceError> {
        if xs.len() != ys.len() {
            return Err(PerformanceError::MismatchedGrid {
                left: xs.len(),
                right: ys.len(),
            });
        }
        let n = xs.len();
        if n < MIN_SAMPLES {
            return Err(PerformanceError::InsufficientSamples {
                defined: n,
                required: MIN_SAMPLES,
            });
        }

        let h: Vec<T> = (0..n - 1).map(|i| xs[i + 1] - xs[i]).collect();
        if h.iter().any(|&hi| !(hi > T::zero())) {
            return Err(PerformanceError::table(
                "fit locations must be strictly increasing",
            ));
        }
        let secant: Vec<T> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();
        let slopes = knot_slopes(&h, &secant);

        let mut pieces = Vec::with_capacity(2 * (n - 1));
        for i in 0..n - 1 {
            pieces.extend(interval_pieces(
                xs[i],
                ys[i],
                h[i],
                secant[i],
                slopes[i],
                slopes[i + 1],
            ));
        }

        let two = T::one() + T::one();
        let lower = Tail::new(
            Piece {
                x0: xs[0],
                y0: ys[0],
                slope: slopes[0],
                curvature: (slopes[1] - slopes[0]) / (two * h[0]),
            },
            false,
        );
        let upper = Tail::new(
            Piece {
                x0: xs[n - 1],
                y0: ys[n - 1],
                slope: slopes[n - 1],
                curvature: (slopes[n - 1] - slopes[n - 2]) / (two * h[n - 2]),
            },
            true,
        );

        Ok(Self {
            pieces,
            lower,
            upper,
        })
    }

    /// Number of quadratic pieces between the first and last sample, two per interval
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Index of the interior piece used at `x`
    #[inline]
    fn piece_index(&self, x: T) -> usize {
        self.pieces
            .partition_point(|p| p.x0 <= x)
            .saturating_sub(1)
            .min(self.pieces.len() - 1)
    }
}

/// Slope at every sample. Each one has the sign of the secants beside it, or is
/// zero, and is at most twice the size of either.
fn knot_slopes<T: Float>(h: &[T], secant: &[T]) -> Vec<T> {
    let m = secant.len();
    if m == 1 {
        return vec![secant[0]; 2];
    }

    let two = T::one() + T::one();
    let mut slopes = vec![T::zero(); m + 1];
    for i in 1..m {
        let (a, b) = (secant[i - 1], secant[i]);
        if a * b > T::zero() {
            slopes[i] = two * a * b / (a + b);
        }
    }
    slopes[0] = end_slope(h[0], h[1], secant[0], secant[1]);
    slopes[m] = end_slope(h[m - 1], h[m - 2], secant[m - 1], secant[m - 2]);

    slopes
}

/// Three-point slope at an end sample, from the end interval `(h0, s0)` and
/// its neighbour `(h1, s1)`.
fn end_slope<T: Float>(h0: T, h1: T, s0: T, s1: T) -> T {
    let two = T::one() + T::one();
    let d = ((two * h0 + h1) * s0 - h0 * s1) / (h0 + h1);
    if d * s0 <= T::zero() {
        T::zero()
    } else if d.abs() > two * s0.abs() {
        two * s0
    } else {
        d
    }
}

/// The two pieces covering `[x0, x0 + h]`, with slope `s0` at the left sample
/// and `s1` at the right.
fn interval_pieces<T: Float>(x0: T, y0: T, h: T, secant: T, s0: T, s1: T) -> [Piece<T>; 2] {
    let two = T::one() + T::one();
    let (e0, e1) = (s0 - secant, s1 - secant);

    // Offset of the interior knot
    let a = if e0 * e1 >= T::zero() {
        h / two
    } else {
        // Slopes on opposite sides of the secant. `join` is where a middle
        // slope equal to the secant would meet both ends.
        let join = h * e1 / (s1 - s0);
        if e1.abs() < e0.abs() {
            join / two
        } else {
            (join + h) / two
        }
    };
    let b = h - a;
    let mid = (two * secant * h - a * s0 - b * s1) / h;

    [
        Piece {
            x0,
            y0,
            slope: s0,
            curvature: (mid - s0) / (two * a),
        },
        Piece {
            x0: x0 + a,
            y0: y0 + a * (s0 + mid) / two,
            slope: mid,
            curvature: (s1 - mid) / (two * b),
        },
    ]
}

impl<T: Float> Fitted1D<T> for QuadraticSpline1D<T> {
    #[inline]
    fn eval_one(&self, loc: T) -> T {
        if loc < self.lower.piece.x0 {
            self.lower.value(loc)
        } else if loc >= self.upper.piece.x0 {
            self.upper.value(loc)
        } else {
            let p = &self.pieces[self.piece_index(loc)];
            p.at(loc - p.x0)
        }
    }

    #[inline]
    fn derivative(&self, loc: T) -> T {
        if loc < self.lower.piece.x0 {
            self.lower.derivative(loc)
        } else if loc >= self.upper.piece.x0 {
            self.upper.derivative(loc)
        } else {
            let p = &self.pieces[self.piece_index(loc)];
            p.slope_at(loc - p.x0)
        }
    }

    fn domain(&self) -> (T, T) {
        (self.lower.piece.x0, self.upper.piece.x0)
    }
}

#[cfg(test)]
mod test {
    use super::QuadraticSpline1D;
    use crate::curve::ReferenceCurve;
    use crate::error::PerformanceError;
    use crate::fit::{Extrap, Fitted1D};
    use crate::testing::*;
    use crate::utils::linspace;

    /// Reproduces every sample, on regular and irregular grids
    #[test]
    fn test_passes_through_samples() {
        let mut rng = rng_fixed_seed();
        for n in 2..=21 {
            let x = jittered_linspace(&mut rng, -60.0, 140.0, n, 2.0);
            let y = randn::<f64>(&mut rng, n);

            let spline = QuadraticSpline1D::new(&x, &y).unwrap();
            assert_eq!(spline.len(), 2 * (n - 1));
            (0..n).for_each(|i| assert!((spline.eval_one(x[i]) - y[i]).abs() < 1e-12));
        }
    }

    /// Monotone data gives a monotone spline, between the samples and past both ends
    #[test]
    fn test_monotone_data() {
        let mut rng = rng_fixed_seed();
        for trial in 0..200 {
            let n = 2 + trial % 20;
            let x = jittered_linspace(&mut rng, 0.0, 1000.0, n, 20.0);
            let sign = if trial % 2 == 0 { 1.0 } else { -1.0 };
            let y: Vec<f64> = monotone_samples(&mut rng, n)
                .into_iter()
                .map(|v| sign * v)
                .collect();
            let spline = QuadraticSpline1D::new(&x, &y).unwrap();

            let obs = linspace(x[0] - 500.0, x[n - 1] + 500.0, 1001);
            let vals = spline.eval_alloc(&obs);
            assert!(vals.windows(2).all(|w| sign * (w[1] - w[0]) >= -1e-12));
        }
    }

    /// On each interval the spline stays between the two samples around it,
    /// so local extrema of the data are not overshot
    #[test]
    fn test_bounded_by_neighbours() {
        let mut rng = rng_fixed_seed();
        let x = jittered_linspace(&mut rng, 4000.0, 12000.0, 9, 100.0);
        let y: Vec<f64> = randn::<f64>(&mut rng, 9).iter().map(|v| 100.0 + 40.0 * v).collect();
        let spline = QuadraticSpline1D::new(&x, &y).unwrap();

        for i in 0..8 {
            let (lo, hi) = (y[i].min(y[i + 1]), y[i].max(y[i + 1]));
            for obs in linspace(x[i], x[i + 1], 50) {
                let v = spline.eval_one(obs);
                assert!(lo - 1e-9 <= v && v <= hi + 1e-9);
            }
        }
    }

    /// Continuous value and slope where pieces meet, including the tails
    #[test]
    fn test_c1_continuity() {
        let mut rng = rng_fixed_seed();
        let x = jittered_linspace(&mut rng, 4000.0, 12000.0, 9, 100.0);
        let y: Vec<f64> = randn::<f64>(&mut rng, 9).iter().map(|v| 100.0 + 40.0 * v).collect();
        let spline = QuadraticSpline1D::new(&x, &y).unwrap();

        for w in spline.pieces.windows(2) {
            let dx = w[1].x0 - w[0].x0;
            assert!(dx > 0.0);
            assert!((w[0].at(dx) - w[1].y0).abs() < 1e-9);
            assert!((w[0].slope_at(dx) - w[1].slope).abs() < 1e-9);
        }

        let (first, last) = (&spline.pieces[0], &spline.pieces[spline.len() - 1]);
        assert_eq!(spline.lower.piece.slope, first.slope);
        let dx = x[8] - last.x0;
        assert!((last.at(dx) - y[8]).abs() < 1e-9);
        assert!((last.slope_at(dx) - spline.upper.piece.slope).abs() < 1e-9);
    }

    #[test]
    fn test_two_points_is_linear() {
        let spline = QuadraticSpline1D::new(&[0.0_f64, 10.0], &[1.0, 3.0]).unwrap();
        for (x, y) in [(5.0, 2.0), (20.0, 5.0), (-10.0, -1.0)] {
            assert!((spline.eval_one(x) - y).abs() < 1e-12);
        }
        assert!((spline.derivative(100.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_flat_data() {
        let spline = QuadraticSpline1D::new(&linspace(0.0_f64, 50.0, 6), &[1.0; 6]).unwrap();
        for obs in [-100.0, 0.0, 12.5, 50.0, 400.0] {
            assert_eq!(spline.eval_one(obs), 1.0);
            assert_eq!(spline.derivative(obs), 0.0);
        }
    }

    /// A continuation that would turn back against the data holds level instead
    #[test]
    fn test_tail_holds_past_vertex() {
        // Rising and flattening toward the top end
        let spline =
            QuadraticSpline1D::new(&[0.0_f64, 1.0, 2.0, 3.0], &[0.0, 2.0, 3.0, 3.5]).unwrap();

        assert!(spline.eval_one(3.3) > 3.5);
        let far = spline.eval_one(10.0);
        assert!(far > 3.5);
        assert!((far - spline.eval_one(100.0)).abs() < 1e-12);
        assert_eq!(spline.derivative(10.0), 0.0);

        // The bottom end keeps falling
        assert!(spline.eval_one(-1.0) < 0.0);
        assert!(spline.eval_one(-2.0) < spline.eval_one(-1.0));
    }

    #[test]
    fn test_no_data_excluded() {
        // Zeros in place of the missing points would drag the fit far below 100
        let curve = ReferenceCurve::new(
            linspace(4000.0_f64, 12000.0, 9),
            vec![
                None,
                None,
                Some(125.0),
                Some(118.0),
                Some(112.0),
                Some(107.0),
                Some(103.0),
                Some(100.0),
                Some(98.0),
            ],
        )
        .unwrap();
        let spline = QuadraticSpline1D::fit(&curve).unwrap();

        assert_eq!(spline.domain(), (6000.0, 12000.0));
        assert_eq!(spline.eval_one(6000.0), 125.0);
        assert!(spline.eval_one(5000.0) > 125.0);
        assert_eq!(spline.locate(5000.0), Extrap::OutsideLow);
        assert_eq!(spline.locate(12500.0), Extrap::OutsideHigh);
        assert_eq!(spline.locate(8000.0), Extrap::Inside);
    }

    #[test]
    fn test_insufficient_samples() {
        let curve =
            ReferenceCurve::new(vec![0.0_f64, 1.0, 2.0], vec![None, Some(1.0), None]).unwrap();
        assert!(matches!(
            QuadraticSpline1D::fit(&curve),
            Err(PerformanceError::InsufficientSamples {
                defined: 1,
                required: 2
            })
        ));
        assert!(QuadraticSpline1D::<f64>::new(&[0.0, 1.0], &[1.0]).is_err());
        assert!(QuadraticSpline1D::<f64>::new(&[1.0, 0.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_eval_batch() {
        let spline = QuadraticSpline1D::new(&[0.0_f64, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        let locs = [0.5, 1.5, 3.0];
        let mut out = [0.0; 3];
        spline.eval(&locs, &mut out).unwrap();
        assert_eq!(spline.eval_alloc(&locs), out.to_vec());
        assert!(0.0 < out[0] && out[0] < 1.0);
        assert!(1.0 < out[1] && out[1] < 4.0);
        assert!(out[2] > 4.0);
        assert!(spline.eval(&locs, &mut [0.0; 2]).is_err());
    }
}
