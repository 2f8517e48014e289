//! Tabulated reference curves.
//!
//! A curve is a list of samples on a strictly increasing grid of the
//! independent variable. Temperature curves hold density ratio against
//! temperature; go-speed curves hold minimum-go speed against runway length.
//!
//! A sample may be missing: the source charts have no performance point for
//! some weight and runway combinations. Those are carried as `None` all the
//! way through blending and are dropped, not zeroed, when a curve is fitted.

pub mod blend;

use itertools::Itertools;
use num_traits::Float;

use crate::error::PerformanceError;

pub use blend::{blend, blend_scalar};

/// One dependent value; `None` marks "no data" at that grid point.
pub type Sample<T> = Option<T>;

/// An ordered set of `(x, y)` samples with no duplicate `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCurve<T: Float> {
    grid: Vec<T>,
    samples: Vec<Sample<T>>,
}

impl<T: Float> ReferenceCurve<T> {
    /// Build a curve from its grid and samples.
    ///
    /// # Errors
    /// * If the grid and sample lengths differ
    /// * If the grid has fewer than 2 entries
    /// * If the grid is not strictly increasing, or contains non-finite values
    /// * If any defined sample is not finite
    pub fn new(grid: Vec<T>, samples: Vec<Sample<T>>) -> Result<Self, PerformanceError> {
        if grid.len() != samples.len() {
            return Err(PerformanceError::table(format!(
                "grid has {} entries but curve has {} samples",
                grid.len(),
                samples.len()
            )));
        }
        if grid.len() < 2 {
            return Err(PerformanceError::table(
                "curves must have at least two grid entries",
            ));
        }
        if grid.iter().any(|x| !x.is_finite()) {
            return Err(PerformanceError::table("grid values must be finite"));
        }
        let increasing = grid.iter().tuple_windows().all(|(a, b)| b > a);
        if !increasing {
            return Err(PerformanceError::table(
                "grid must be strictly increasing",
            ));
        }
        if samples.iter().flatten().any(|y| !y.is_finite()) {
            return Err(PerformanceError::table(
                "sample values must be finite; use null for missing data",
            ));
        }

        Ok(Self { grid, samples })
    }

    /// Build a curve in which every sample is defined.
    pub fn from_values(grid: Vec<T>, values: Vec<T>) -> Result<Self, PerformanceError> {
        Self::new(grid, values.into_iter().map(Some).collect())
    }

    pub fn grid(&self) -> &[T] {
        &self.grid
    }

    pub fn samples(&self) -> &[Sample<T>] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// The sample at grid index `i`, or `None` past the end or at a no-data point.
    pub fn value_at(&self, i: usize) -> Sample<T> {
        self.samples.get(i).copied().flatten()
    }

    /// Number of samples carrying data
    pub fn defined_count(&self) -> usize {
        self.samples.iter().flatten().count()
    }

    /// `(x, y)` pairs for the samples that carry data, in grid order
    pub fn defined_points(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.grid
            .iter()
            .zip(self.samples.iter())
            .filter_map(|(&x, &y)| y.map(|y| (x, y)))
    }

    /// Whether both curves are sampled on exactly the same grid.
    pub fn same_grid(&self, other: &Self) -> bool {
        self.grid == other.grid
    }

    /// Replace the samples, keeping the grid.
    pub(crate) fn with_samples(&self, samples: Vec<Sample<T>>) -> Self {
        debug_assert_eq!(samples.len(), self.grid.len());
        Self {
            grid: self.grid.clone(),
            samples,
        }
    }
}
