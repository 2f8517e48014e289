//! Continuous functions fitted through the samples of a reference curve.
//!
//! Fitted functions are built per query and thrown away afterward. They
//! evaluate anywhere on the real line: inside the sampled domain they
//! interpolate, outside it they continue the trend at each end and hold
//! level once that trend would turn back. Extrapolated values are an answer,
//! not a validated one.

pub mod quadratic;

use num_traits::Float;

use crate::error::PerformanceError;

pub use quadratic::QuadraticSpline1D;

/// Where an observation point falls relative to the sampled domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extrap {
    Inside,
    OutsideLow,
    OutsideHigh,
}

/// A one-dimensional fitted function.
pub trait Fitted1D<T: Float> {
    /// Evaluate the function at an observation point.
    fn eval_one(&self, loc: T) -> T;

    /// Slope of the function at an observation point.
    fn derivative(&self, loc: T) -> T;

    /// Smallest and largest sample location the function was fitted through.
    fn domain(&self) -> (T, T);

    /// Classify an observation point against the fitted domain.
    #[inline]
    fn locate(&self, loc: T) -> Extrap {
        let (lo, hi) = self.domain();
        match loc {
            x if x < lo => Extrap::OutsideLow,
            x if x > hi => Extrap::OutsideHigh,
            _ => Extrap::Inside,
        }
    }

    /// Evaluate the function at a set of observation points.
    #[inline]
    fn eval(&self, locs: &[T], out: &mut [T]) -> Result<(), PerformanceError> {
        if locs.len() != out.len() {
            return Err(PerformanceError::MismatchedGrid {
                left: locs.len(),
                right: out.len(),
            });
        }

        for i in 0..locs.len() {
            out[i] = self.eval_one(locs[i]);
        }

        Ok(())
    }

    /// Evaluate the function at a set of observation points, allocating
    /// for the output values for convenience.
    #[inline]
    fn eval_alloc(&self, locs: &[T]) -> Vec<T> {
        locs.iter().map(|&x| self.eval_one(x)).collect()
    }
}
