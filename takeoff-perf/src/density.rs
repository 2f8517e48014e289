//! Density ratio from temperature and field elevation.
//!
//! The altitude bracket picks the two temperature curves around the field
//! elevation, those are blended into one curve for that elevation, and a
//! quadratic spline through the blended curve is evaluated at the temperature.
use log::{debug, trace};

use crate::bracket::Bracket;
use crate::curve::{blend, ReferenceCurve};
use crate::error::PerformanceError;
use crate::fit::{Extrap, Fitted1D, QuadraticSpline1D};
use crate::tables::DensityRatioTable;

/// Density ratio as a continuous function of temperature at one elevation.
#[derive(Debug, Clone)]
pub struct TemperatureInterpolator {
    spline: QuadraticSpline1D<f64>,
}

impl TemperatureInterpolator {
    /// Fit through a density-ratio-vs-temperature curve.
    pub fn fit(curve: &ReferenceCurve<f64>) -> Result<Self, PerformanceError> {
        Ok(Self {
            spline: QuadraticSpline1D::fit(curve)?,
        })
    }

    /// Density ratio at `temperature`, extrapolated outside the tabulated range.
    pub fn evaluate(&self, temperature: f64) -> f64 {
        let dr = self.spline.eval_one(temperature);
        if self.spline.locate(temperature) != Extrap::Inside {
            debug!("temperature {temperature} is outside the tabulated range, extrapolating");
        }
        trace!("density ratio at {temperature}: {dr}");
        dr
    }

    /// Fitted curve evaluated at each of `temperatures`
    pub fn evaluate_all(&self, temperatures: &[f64]) -> Vec<f64> {
        self.spline.eval_alloc(temperatures)
    }

    pub fn fitted(&self) -> &QuadraticSpline1D<f64> {
        &self.spline
    }
}

/// The temperature curve for a field elevation.
///
/// On an altitude key the tabulated curve is used as is; between keys the two
/// neighbours are blended.
///
/// # Errors
/// * `OutOfDomain` if the elevation is outside the tabulated altitudes
pub fn curve_for_elevation(
    table: &DensityRatioTable,
    elevation: f64,
) -> Result<(Bracket, ReferenceCurve<f64>), PerformanceError> {
    let bracket = table.altitude_bracket(elevation)?;
    debug!(
        "elevation {elevation}: altitude keys {} / {}, fraction {:.3}",
        bracket.lower_key, bracket.upper_key, bracket.fraction
    );

    let curve = if bracket.is_degenerate() {
        table.curve(bracket.lower).clone()
    } else {
        blend(
            table.curve(bracket.lower),
            table.curve(bracket.upper),
            bracket.fraction,
        )?
    };

    Ok((bracket, curve))
}
