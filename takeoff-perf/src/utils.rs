//! Grid construction and display rounding helpers.
use num_traits::Float;

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    if n < 2 {
        return vec![start; n];
    }
    let dx: T = (stop - start) / T::from(n - 1).unwrap_or_else(T::one);
    (0..n)
        .map(|i| start + T::from(i).unwrap_or_else(T::zero) * dx)
        .collect()
}

/// Values from `start` to `stop` in increments of `step`, including `stop`
/// when it falls on the step pattern. Each entry is computed from its index
/// so that long ranges do not accumulate drift.
pub fn arange_inclusive<T>(start: T, stop: T, step: T) -> Vec<T>
where
    T: Float,
{
    if !(step > T::zero()) || stop < start {
        return Vec::new();
    }
    // Half-step slack so that a `stop` landing on the pattern survives float error
    let half = step / (T::one() + T::one());
    let n = ((stop - start + half) / step)
        .floor()
        .to_usize()
        .unwrap_or(0)
        + 1;
    (0..n)
        .map(|i| start + step * T::from(i).unwrap_or_else(T::zero))
        .collect()
}

/// Round to `digits` decimal places, taking ties to the even neighbor.
pub fn round_to(x: f64, digits: u32) -> f64 {
    let (pow1, pow2) = if digits > 22 {
        // Each factor is safe from overflow, their product may not be
        (10.0_f64.powi((digits - 22) as i32), 1e22)
    } else {
        (10.0_f64.powi(digits as i32), 1.0)
    };

    let y = (x * pow1) * pow2;
    let mut z = y.round();
    if (y - z).abs() == 0.5 {
        z = 2.0 * (y / 2.0).round();
    }

    (z / pow2) / pow1
}
