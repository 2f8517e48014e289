//! End-to-end performance query.
//!
//! A query moves through a fixed sequence of stages:
//!
//! | Stage                  | Reached after                                              |
//! |------------------------|------------------------------------------------------------|
//! | `Start`                | inputs accepted                                            |
//! | `AltitudeResolved`     | altitude bracket, blended temperature curve, and its fit   |
//! | `DensityRatioResolved` | density ratio evaluated at the temperature and rounded     |
//! | `WeightAndDrBracketed` | weight bracket and density-ratio bracket selected          |
//! | `MinGoResolved`        | both row fits evaluated at the runway length and blended   |
//!
//! If an input or the resolved density ratio falls outside the tables, the
//! query stops and reports the last stage it completed; no nearby bracket is
//! substituted.
//!
//! ```rust
//! use takeoff_perf::config::PerformanceConfig;
//! use takeoff_perf::pipeline::{compute, PerformanceRequest};
//! use takeoff_perf::tables::ReferenceTables;
//!
//! let tables = ReferenceTables::embedded().unwrap();
//! let request = PerformanceRequest {
//!     temperature: 60,
//!     elevation: 0,
//!     weight: 56000,
//!     runway_length: 8000,
//! };
//! let response = compute(&tables, &PerformanceConfig::default(), &request).unwrap();
//! assert_eq!(response.density_ratio, 1.00);
//! ```
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bracket::Bracket;
use crate::config::PerformanceConfig;
use crate::density::{curve_for_elevation, TemperatureInterpolator};
use crate::error::{Axis, PerformanceError};
use crate::mingo::MinGoFunction;
use crate::tables::ReferenceTables;
use crate::utils::{arange_inclusive, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Start,
    AltitudeResolved,
    DensityRatioResolved,
    WeightAndDrBracketed,
    MinGoResolved,
}

/// Inputs as entered: whole degrees F, and feet and pounds in whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRequest {
    pub temperature: i32,
    pub elevation: u32,
    pub weight: u32,
    pub runway_length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Fitted curves sampled for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Density ratio against temperature at the field elevation
    pub density_ratio: Vec<ChartPoint>,
    /// Minimum-go speed against runway length at the resolved weight and density ratio
    pub min_go_speed: Vec<ChartPoint>,
}

/// Density ratio at the field elevation and temperature.
#[derive(Debug, Clone)]
pub struct DensityRatioResolution {
    pub altitude: Bracket,
    /// Rounded for display
    pub density_ratio: f64,
    pub density_ratio_unrounded: f64,
    pub interpolator: TemperatureInterpolator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceResponse {
    /// Rounded for display
    pub density_ratio: f64,
    pub density_ratio_unrounded: f64,
    /// Rounded for display
    pub min_go_speed: f64,
    pub min_go_speed_unrounded: f64,
    pub altitude: Bracket,
    pub weight: Bracket,
    pub density_ratio_rows: Bracket,
    pub chart: Option<Chart>,
}

/// A query that could not be completed.
#[derive(Debug, Error)]
#[error("stopped after {reached:?}: {source}")]
pub struct Halted {
    /// Last stage completed
    pub reached: Stage,
    /// Displayed density ratio, when the query got that far
    pub density_ratio: Option<f64>,
    pub source: PerformanceError,
}

fn halt(reached: Stage, density_ratio: Option<f64>) -> impl FnOnce(PerformanceError) -> Halted {
    move |source| Halted {
        reached,
        density_ratio,
        source,
    }
}

/// Resolve the density ratio alone.
pub fn compute_density_ratio(
    tables: &ReferenceTables,
    config: &PerformanceConfig,
    temperature: i32,
    elevation: u32,
) -> Result<DensityRatioResolution, Halted> {
    let temperature = f64::from(temperature);
    config
        .limits
        .check(Axis::Temperature, temperature)
        .map_err(halt(Stage::Start, None))?;
    resolve_density_ratio(tables, config, temperature, f64::from(elevation))
}

fn resolve_density_ratio(
    tables: &ReferenceTables,
    config: &PerformanceConfig,
    temperature: f64,
    elevation: f64,
) -> Result<DensityRatioResolution, Halted> {
    let (altitude, curve) =
        curve_for_elevation(&tables.density_ratio, elevation).map_err(halt(Stage::Start, None))?;
    let interpolator = TemperatureInterpolator::fit(&curve).map_err(halt(Stage::Start, None))?;
    debug!("stage {:?}", Stage::AltitudeResolved);

    let unrounded = interpolator.evaluate(temperature);
    let density_ratio = round_to(unrounded, config.display_digits);
    debug!(
        "stage {:?}: density ratio {density_ratio} ({unrounded})",
        Stage::DensityRatioResolved
    );

    Ok(DensityRatioResolution {
        altitude,
        density_ratio,
        density_ratio_unrounded: unrounded,
        interpolator,
    })
}

/// Run a full query: density ratio, then minimum-go speed.
pub fn compute(
    tables: &ReferenceTables,
    config: &PerformanceConfig,
    request: &PerformanceRequest,
) -> Result<PerformanceResponse, Halted> {
    let temperature = f64::from(request.temperature);
    let elevation = f64::from(request.elevation);
    let weight = f64::from(request.weight);
    let runway_length = f64::from(request.runway_length);

    config
        .limits
        .check(Axis::Temperature, temperature)
        .and_then(|_| config.limits.check(Axis::RunwayLength, runway_length))
        .map_err(halt(Stage::Start, None))?;

    let dr = resolve_density_ratio(tables, config, temperature, elevation)?;
    let displayed = Some(dr.density_ratio);

    // Compatibility: downstream brackets follow the displayed value by default
    let dr_for_brackets = if config.bracket_on_rounded_density_ratio {
        dr.density_ratio
    } else {
        dr.density_ratio_unrounded
    };

    let at_dr = || halt(Stage::DensityRatioResolved, displayed);
    let weight_bracket = tables.min_go.weight_bracket(weight).map_err(at_dr())?;
    let dr_bracket = tables
        .min_go
        .density_ratio_bracket(dr_for_brackets)
        .map_err(at_dr())?;
    debug!("stage {:?}", Stage::WeightAndDrBracketed);

    let at_brackets = || halt(Stage::WeightAndDrBracketed, displayed);
    let function =
        MinGoFunction::new(&tables.min_go, &weight_bracket, &dr_bracket).map_err(at_brackets())?;
    let speed = function.evaluate(runway_length).map_err(at_brackets())?;
    let min_go_speed = round_to(speed, config.display_digits);
    debug!("stage {:?}: minimum-go speed {min_go_speed} ({speed})", Stage::MinGoResolved);

    let chart = if config.chart.enabled {
        Some(chart(tables, config, &dr.interpolator, &function).map_err(at_brackets())?)
    } else {
        None
    };

    Ok(PerformanceResponse {
        density_ratio: dr.density_ratio,
        density_ratio_unrounded: dr.density_ratio_unrounded,
        min_go_speed,
        min_go_speed_unrounded: speed,
        altitude: dr.altitude,
        weight: weight_bracket,
        density_ratio_rows: dr_bracket,
        chart,
    })
}

fn chart(
    tables: &ReferenceTables,
    config: &PerformanceConfig,
    temperature: &TemperatureInterpolator,
    min_go: &MinGoFunction,
) -> Result<Chart, PerformanceError> {
    let span = |grid: &[f64], step: f64| {
        arange_inclusive(grid[0], grid[grid.len() - 1], step)
    };

    let temperatures = span(tables.density_ratio.temperatures(), config.chart.temperature_step);
    let density_ratio = temperatures
        .iter()
        .zip(temperature.evaluate_all(&temperatures))
        .map(|(&x, y)| ChartPoint { x, y })
        .collect();

    let lengths = span(tables.min_go.runway_lengths(), config.chart.runway_length_step);
    let min_go_speed = lengths
        .iter()
        .zip(min_go.evaluate_all(&lengths)?)
        .map(|(&x, y)| ChartPoint { x, y })
        .collect();

    Ok(Chart {
        density_ratio,
        min_go_speed,
    })
}

/// Reference tables and configuration bundled for repeated queries.
#[derive(Debug, Clone)]
pub struct PerformanceCalculator {
    tables: ReferenceTables,
    config: PerformanceConfig,
}

impl PerformanceCalculator {
    pub fn new(tables: ReferenceTables, config: PerformanceConfig) -> Self {
        Self { tables, config }
    }

    /// Embedded tables with default configuration
    pub fn embedded() -> Result<Self, PerformanceError> {
        Ok(Self::new(ReferenceTables::embedded()?, PerformanceConfig::default()))
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    pub fn compute(&self, request: &PerformanceRequest) -> Result<PerformanceResponse, Halted> {
        compute(&self.tables, &self.config, request)
    }
}
