//! Takeoff performance from tabulated reference curves: density ratio from
//! temperature and field elevation, and minimum-go speed from weight,
//! density ratio, and runway length.
//!
//! Both quantities are read off families of discrete curves. A continuous
//! input is located between two tabulated curves, the pair is blended
//! sample by sample, and a quadratic spline through the blend is evaluated
//! at the remaining input.
//!
//! | Step                         | Module     | Input(s)                      |
//! |------------------------------|------------|-------------------------------|
//! | Altitude bracket + blend     | `density`  | field elevation               |
//! | Temperature fit              | `density`  | temperature                   |
//! | Weight and DR brackets       | `mingo`    | weight, density ratio         |
//! | Runway fits + DR blend       | `mingo`    | runway length                 |
//!
//! Every query is independent: fits are built, evaluated, and dropped.
//! The reference tables are the only shared data and are read-only.
//!
//! # Example
//! ```rust
//! use takeoff_perf::{PerformanceCalculator, PerformanceRequest};
//!
//! let calculator = PerformanceCalculator::embedded().unwrap();
//! let response = calculator
//!     .compute(&PerformanceRequest {
//!         temperature: 85,
//!         elevation: 2500,
//!         weight: 51000,
//!         runway_length: 7600,
//!     })
//!     .unwrap();
//!
//! assert!(response.density_ratio < 1.0);
//! assert!(response.min_go_speed > 0.0);
//! ```
// These "needless" range loops read closer to the math
#![allow(clippy::needless_range_loop)]

pub mod bracket;
pub mod config;
pub mod curve;
pub mod density;
pub mod error;
pub mod fit;
pub mod mingo;
pub mod pipeline;
pub mod tables;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use bracket::{Bracket, BracketAxis, KeyOrder};
pub use config::PerformanceConfig;
pub use curve::ReferenceCurve;
pub use error::{Axis, PerformanceError};
pub use fit::{Fitted1D, QuadraticSpline1D};
pub use pipeline::{
    compute, Halted, PerformanceCalculator, PerformanceRequest, PerformanceResponse, Stage,
};
pub use tables::ReferenceTables;
