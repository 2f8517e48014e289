//! Query configuration: display rounding, input limits, and chart sampling.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Axis, PerformanceError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerformanceConfig {
    /// Decimal digits kept in displayed metrics
    pub display_digits: u32,
    /// Pick the minimum-go brackets with the displayed (rounded) density ratio
    /// instead of the full-precision value.
    pub bracket_on_rounded_density_ratio: bool,
    pub limits: InputLimits,
    pub chart: ChartConfig,
}

/// Accepted ranges for inputs that are not bounded by table keys.
///
/// Elevation and weight are limited by the tables themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputLimits {
    pub temperature: (f64, f64),  // [deg F]
    pub runway_length: (f64, f64), // [ft]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub enabled: bool,
    pub temperature_step: f64,  // [deg F]
    pub runway_length_step: f64, // [ft]
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            display_digits: 2,
            bracket_on_rounded_density_ratio: true,
            limits: InputLimits::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            temperature: (-100.0, 200.0),
            runway_length: (1000.0, 20000.0),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            temperature_step: 1.0,
            runway_length_step: 100.0,
        }
    }
}

impl PerformanceConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PerformanceError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, PerformanceError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PerformanceError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn validate(&self) -> Result<(), PerformanceError> {
        let ordered = |(lo, hi): (f64, f64)| lo.is_finite() && hi.is_finite() && lo <= hi;
        if !ordered(self.limits.temperature) || !ordered(self.limits.runway_length) {
            return Err(PerformanceError::table("input limits must be finite and ordered"));
        }
        if !(self.chart.temperature_step > 0.0 && self.chart.runway_length_step > 0.0) {
            return Err(PerformanceError::table("chart steps must be positive"));
        }
        Ok(())
    }
}

impl InputLimits {
    /// # Errors
    /// * `OutOfDomain` if `value` is not finite or outside the limits for `axis`
    pub fn check(&self, axis: Axis, value: f64) -> Result<(), PerformanceError> {
        let (min, max) = match axis {
            Axis::Temperature => self.temperature,
            Axis::RunwayLength => self.runway_length,
            _ => return Ok(()),
        };
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(PerformanceError::OutOfDomain {
                axis,
                value,
                min,
                max,
            })
        }
    }
}
