//! Sample-by-sample linear blending of two curves on a shared grid.

use num_traits::Float;

use super::{ReferenceCurve, Sample};
use crate::error::PerformanceError;

/// Blend two curves as `(1 - fraction) * a + fraction * b` at every grid point.
///
/// A point that is missing in either input is missing in the output.
///
/// # Errors
/// * `MismatchedGrid` if the curves are not sampled on the same grid.
///   Reference tables are validated at load, so this indicates a defect.
/// * `Fraction` if `fraction` is not within [0, 1]
pub fn blend<T: Float>(
    a: &ReferenceCurve<T>,
    b: &ReferenceCurve<T>,
    fraction: T,
) -> Result<ReferenceCurve<T>, PerformanceError> {
    if !a.same_grid(b) {
        return Err(PerformanceError::MismatchedGrid {
            left: a.len(),
            right: b.len(),
        });
    }
    check_fraction(fraction)?;

    let samples: Vec<Sample<T>> = a
        .samples()
        .iter()
        .zip(b.samples().iter())
        .map(|(&ya, &yb)| match (ya, yb) {
            (Some(ya), Some(yb)) => Some(mix(ya, yb, fraction)),
            _ => None,
        })
        .collect();

    Ok(a.with_samples(samples))
}

/// Blend two scalars with the same weighting as [`blend`].
pub fn blend_scalar<T: Float>(a: T, b: T, fraction: T) -> Result<T, PerformanceError> {
    check_fraction(fraction)?;
    Ok(mix(a, b, fraction))
}

#[inline]
fn mix<T: Float>(a: T, b: T, fraction: T) -> T {
    // Exact at both ends and for equal inputs, so those cases reproduce the input bit for bit
    if fraction == T::zero() || a == b {
        a
    } else if fraction == T::one() {
        b
    } else {
        (T::one() - fraction) * a + fraction * b
    }
}

#[inline]
fn check_fraction<T: Float>(fraction: T) -> Result<(), PerformanceError> {
    if fraction >= T::zero() && fraction <= T::one() {
        Ok(())
    } else {
        Err(PerformanceError::Fraction(fraction.to_f64().unwrap_or(f64::NAN)))
    }
}
