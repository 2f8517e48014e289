//! Selection of the pair of reference curves that bound a continuous input.
//!
//! Each table axis (altitude, weight, density ratio) is a short, strictly
//! monotonic list of keys. An input inside the keys maps to the two adjacent
//! keys around it and the fractional position between them; an input on a key
//! maps to that key alone. Inputs outside the keys are rejected rather than
//! snapped to the nearest curve.
//!
//! ```rust
//! use takeoff_perf::bracket::{BracketAxis, KeyOrder};
//! use takeoff_perf::error::Axis;
//!
//! let altitudes = BracketAxis::new(
//!     Axis::Elevation,
//!     vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0],
//!     KeyOrder::Ascending,
//! )
//! .unwrap();
//!
//! let bracket = altitudes.select(3000.0).unwrap();
//! assert_eq!((bracket.lower, bracket.upper), (1, 2));
//! assert_eq!(bracket.fraction, 0.5);
//! ```
use itertools::Itertools;
use serde::Serialize;

use crate::error::{Axis, PerformanceError};

/// Direction in which an axis' keys are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Intervals are `[k_i, k_i+1)`; the last interval also includes its top key.
    Ascending,
    /// Intervals are `(k_i+1, k_i]`; the last interval also includes its bottom key.
    Descending,
}

/// Two adjacent keys and the position of an input between them.
///
/// `lower` and `upper` index the axis keys in listed order, so on a descending
/// axis `lower_key > upper_key`. `fraction` is 0 at `lower_key` and 1 at `upper_key`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bracket {
    pub lower: usize,
    pub upper: usize,
    pub lower_key: f64,
    pub upper_key: f64,
    pub fraction: f64,
}

impl Bracket {
    fn exact(i: usize, key: f64) -> Self {
        Self {
            lower: i,
            upper: i,
            lower_key: key,
            upper_key: key,
            fraction: 0.0,
        }
    }

    /// The input sits on a key; only that curve is needed, no blend.
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }
}

/// An ordered list of discrete table keys along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketAxis {
    axis: Axis,
    keys: Vec<f64>,
    order: KeyOrder,
}

impl BracketAxis {
    /// # Errors
    /// * If there are fewer than two keys
    /// * If any key is not finite
    /// * If the keys are not strictly monotonic in the stated order
    pub fn new(axis: Axis, keys: Vec<f64>, order: KeyOrder) -> Result<Self, PerformanceError> {
        if keys.len() < 2 {
            return Err(PerformanceError::table(format!(
                "{axis} axis needs at least two keys"
            )));
        }
        if keys.iter().any(|k| !k.is_finite()) {
            return Err(PerformanceError::table(format!(
                "{axis} axis keys must be finite"
            )));
        }
        let monotonic = keys.iter().tuple_windows().all(|(a, b)| match order {
            KeyOrder::Ascending => b > a,
            KeyOrder::Descending => b < a,
        });
        if !monotonic {
            return Err(PerformanceError::table(format!(
                "{axis} axis keys must be strictly {}",
                match order {
                    KeyOrder::Ascending => "ascending",
                    KeyOrder::Descending => "descending",
                }
            )));
        }

        Ok(Self { axis, keys, order })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    pub fn order(&self) -> KeyOrder {
        self.order
    }

    /// Smallest and largest key
    pub fn bounds(&self) -> (f64, f64) {
        let (first, last) = (self.keys[0], self.keys[self.keys.len() - 1]);
        match self.order {
            KeyOrder::Ascending => (first, last),
            KeyOrder::Descending => (last, first),
        }
    }

    /// Whether `value` lies within the keys, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        let (min, max) = self.bounds();
        value >= min && value <= max
    }

    /// Find the bracket containing `value`.
    ///
    /// # Errors
    /// * `OutOfDomain` if `value` is not finite or lies outside the keys
    pub fn select(&self, value: f64) -> Result<Bracket, PerformanceError> {
        if !self.contains(value) {
            let (min, max) = self.bounds();
            return Err(PerformanceError::OutOfDomain {
                axis: self.axis,
                value,
                min,
                max,
            });
        }

        if let Some(i) = self.keys.iter().position(|&k| k == value) {
            return Ok(Bracket::exact(i, self.keys[i]));
        }

        // Not on a key and inside the bounds, so this lands strictly
        // between two keys and never on either end of the list.
        let upper = match self.order {
            KeyOrder::Ascending => self.keys.partition_point(|&k| k < value),
            KeyOrder::Descending => self.keys.partition_point(|&k| k > value),
        };
        let lower = upper - 1;
        let (lower_key, upper_key) = (self.keys[lower], self.keys[upper]);
        let fraction = (value - lower_key) / (upper_key - lower_key);

        Ok(Bracket {
            lower,
            upper,
            lower_key,
            upper_key,
            fraction,
        })
    }
}
