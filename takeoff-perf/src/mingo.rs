//! Minimum-go speed from weight, density ratio, and runway length.
//!
//! For each of the two density-ratio rows around the resolved density ratio,
//! the row's curves at the two weights around the aircraft weight are blended,
//! and a quadratic spline through that blend gives speed against runway length.
//! Both splines are evaluated at the runway length and the two speeds are
//! blended by the density-ratio fraction. The rows are blended as scalars, not
//! as curves, because each row has already been blended across weight.
use log::{debug, trace};

use crate::bracket::Bracket;
use crate::curve::{blend, blend_scalar, ReferenceCurve};
use crate::error::PerformanceError;
use crate::fit::{Extrap, Fitted1D, QuadraticSpline1D};
use crate::tables::MinGoTable;

/// Minimum-go speed as a continuous function of runway length,
/// for one weight and one density-ratio row.
#[derive(Debug, Clone)]
pub struct RunwayLengthInterpolator {
    spline: QuadraticSpline1D<f64>,
}

impl RunwayLengthInterpolator {
    /// Fit through a speed-vs-runway-length curve. Points without data are left out.
    ///
    /// # Errors
    /// * `InsufficientSamples` if fewer than two points carry data
    pub fn fit(curve: &ReferenceCurve<f64>) -> Result<Self, PerformanceError> {
        let excluded = curve.len() - curve.defined_count();
        if excluded > 0 {
            debug!("fitting runway curve without {excluded} no-data points");
        }
        Ok(Self {
            spline: QuadraticSpline1D::fit(curve)?,
        })
    }

    /// Speed at `runway_length`, extrapolated outside the fitted range.
    pub fn evaluate(&self, runway_length: f64) -> f64 {
        if self.spline.locate(runway_length) != Extrap::Inside {
            debug!("runway length {runway_length} is outside the fitted range, extrapolating");
        }
        self.spline.eval_one(runway_length)
    }

    pub fn fitted(&self) -> &QuadraticSpline1D<f64> {
        &self.spline
    }
}

/// One density-ratio row of the table, blended across the weight bracket.
pub fn row_for_weight(
    table: &MinGoTable,
    weight: &Bracket,
    row: usize,
) -> Result<ReferenceCurve<f64>, PerformanceError> {
    if weight.is_degenerate() {
        Ok(table.curve(weight.lower, row).clone())
    } else {
        blend(
            table.curve(weight.lower, row),
            table.curve(weight.upper, row),
            weight.fraction,
        )
    }
}

/// Minimum-go speed against runway length for a resolved weight and density ratio.
#[derive(Debug, Clone)]
pub struct MinGoFunction {
    density_ratio: Bracket,
    lower: RunwayLengthInterpolator,
    upper: Option<RunwayLengthInterpolator>,
}

impl MinGoFunction {
    /// Build the two row fits for the given brackets.
    /// On a tabulated density ratio only that row is fitted.
    pub fn new(
        table: &MinGoTable,
        weight: &Bracket,
        density_ratio: &Bracket,
    ) -> Result<Self, PerformanceError> {
        let lower = RunwayLengthInterpolator::fit(&row_for_weight(table, weight, density_ratio.lower)?)?;
        let upper = if density_ratio.is_degenerate() {
            None
        } else {
            Some(RunwayLengthInterpolator::fit(&row_for_weight(
                table,
                weight,
                density_ratio.upper,
            )?)?)
        };

        Ok(Self {
            density_ratio: *density_ratio,
            lower,
            upper,
        })
    }

    /// Speed at `runway_length`
    pub fn evaluate(&self, runway_length: f64) -> Result<f64, PerformanceError> {
        let lo = self.lower.evaluate(runway_length);
        let speed = match &self.upper {
            Some(upper) => {
                let hi = upper.evaluate(runway_length);
                trace!("row speeds at {runway_length}: {lo} / {hi}");
                blend_scalar(lo, hi, self.density_ratio.fraction)?
            }
            None => lo,
        };
        Ok(speed)
    }

    /// Speeds at each of `runway_lengths`
    pub fn evaluate_all(&self, runway_lengths: &[f64]) -> Result<Vec<f64>, PerformanceError> {
        runway_lengths.iter().map(|&l| self.evaluate(l)).collect()
    }

    pub fn density_ratio_bracket(&self) -> &Bracket {
        &self.density_ratio
    }
}

/// Resolve both brackets and build the speed function.
///
/// # Errors
/// * `OutOfDomain` if the weight or density ratio is outside the table
pub fn min_go_function(
    table: &MinGoTable,
    weight: f64,
    density_ratio: f64,
) -> Result<(Bracket, MinGoFunction), PerformanceError> {
    let weight_bracket = table.weight_bracket(weight)?;
    let dr_bracket = table.density_ratio_bracket(density_ratio)?;
    debug!(
        "weight {weight}: keys {} / {} fraction {:.3}; density ratio {density_ratio}: rows {} / {} fraction {:.3}",
        weight_bracket.lower_key,
        weight_bracket.upper_key,
        weight_bracket.fraction,
        dr_bracket.lower_key,
        dr_bracket.upper_key,
        dr_bracket.fraction
    );

    let function = MinGoFunction::new(table, &weight_bracket, &dr_bracket)?;
    Ok((weight_bracket, function))
}
