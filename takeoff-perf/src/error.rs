//! Error taxonomy for table loading and performance queries.

use std::fmt;

use thiserror::Error;

/// The input or derived quantity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Axis {
    Elevation,
    Weight,
    DensityRatio,
    Temperature,
    RunwayLength,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Elevation => "field elevation",
            Axis::Weight => "aircraft weight",
            Axis::DensityRatio => "density ratio",
            Axis::Temperature => "temperature",
            Axis::RunwayLength => "runway length",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PerformanceError {
    /// A user input, or a value derived from one, is not covered by the reference tables.
    #[error("{axis} {value} is outside the tabulated range [{min}, {max}]")]
    OutOfDomain {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Two curves on different independent-variable grids were blended.
    /// This points at a defect in table construction, never at user input.
    #[error("cannot blend curves on different grids ({left} vs {right} samples)")]
    MismatchedGrid { left: usize, right: usize },

    /// Too few defined samples remained after excluding no-data markers.
    #[error("fit needs at least {required} defined samples, found {defined}")]
    InsufficientSamples { defined: usize, required: usize },

    #[error("blend fraction {0} is outside [0, 1]")]
    Fraction(f64),

    #[error("invalid reference table: {0}")]
    Table(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PerformanceError {
    pub(crate) fn table(msg: impl Into<String>) -> Self {
        PerformanceError::Table(msg.into())
    }

    /// True for errors caused by the query rather than by the crate or its tables.
    pub fn is_out_of_domain(&self) -> bool {
        matches!(self, PerformanceError::OutOfDomain { .. })
    }
}
