//! Reference table store.
//!
//! Two datasets drive every computation:
//!
//! * the density-ratio table, one temperature curve per altitude key, and
//! * the minimum-go table, one runway-length curve per weight key and
//!   density-ratio row.
//!
//! Both are read from JSON. Keys are column names holding numbers, and `null`
//! marks a point the source charts leave blank. The default tables ship with
//! the crate and are available through [`ReferenceTables::embedded`].
//!
//! Once loaded, tables are never mutated; share them by reference.
use std::collections::BTreeMap;
use std::io::Read;

use log::debug;
use serde::Deserialize;

use crate::bracket::{Bracket, BracketAxis, KeyOrder};
use crate::curve::{ReferenceCurve, Sample};
use crate::error::{Axis, PerformanceError};

const EMBEDDED_DENSITY_RATIO: &str = include_str!("../data/density_ratio.json");
const EMBEDDED_MIN_GO: &str = include_str!("../data/min_go.json");

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DensityRatioJson {
    temperature: Vec<f64>,
    curves: BTreeMap<String, Vec<Sample<f64>>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MinGoJson {
    density_ratio: Vec<f64>,
    runway_length: Vec<f64>,
    weights: BTreeMap<String, BTreeMap<String, Vec<Sample<f64>>>>,
}

fn parse_key(axis: Axis, key: &str) -> Result<f64, PerformanceError> {
    key.trim()
        .parse::<f64>()
        .ok()
        .filter(|k| k.is_finite())
        .ok_or_else(|| PerformanceError::table(format!("{axis} key '{key}' is not a number")))
}

/// Parse the column names of a map and sort the columns by numeric key.
fn sorted_columns<V>(
    axis: Axis,
    columns: BTreeMap<String, V>,
) -> Result<(Vec<f64>, Vec<V>), PerformanceError> {
    let mut keyed = columns
        .into_iter()
        .map(|(k, v)| Ok((parse_key(axis, &k)?, v)))
        .collect::<Result<Vec<_>, PerformanceError>>()?;
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(keyed.into_iter().unzip())
}

/// Density ratio against temperature, one curve per altitude.
#[derive(Debug, Clone)]
pub struct DensityRatioTable {
    altitudes: BracketAxis,
    curves: Vec<ReferenceCurve<f64>>,
}

impl DensityRatioTable {
    /// # Errors
    /// * If the altitude keys are not numeric and distinct
    /// * If any curve does not have one sample per temperature
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PerformanceError> {
        let json: DensityRatioJson = serde_json::from_reader(reader)?;
        Self::from_json(json)
    }

    pub fn from_json_str(s: &str) -> Result<Self, PerformanceError> {
        let json: DensityRatioJson = serde_json::from_str(s)?;
        Self::from_json(json)
    }

    fn from_json(json: DensityRatioJson) -> Result<Self, PerformanceError> {
        let (keys, columns) = sorted_columns(Axis::Elevation, json.curves)?;
        let altitudes = BracketAxis::new(Axis::Elevation, keys, KeyOrder::Ascending)?;
        let curves = columns
            .into_iter()
            .map(|samples| ReferenceCurve::new(json.temperature.clone(), samples))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "loaded density ratio table: {} altitudes x {} temperatures",
            curves.len(),
            json.temperature.len()
        );
        Ok(Self { altitudes, curves })
    }

    pub fn altitudes(&self) -> &BracketAxis {
        &self.altitudes
    }

    /// Temperatures at which every curve is sampled
    pub fn temperatures(&self) -> &[f64] {
        self.curves[0].grid()
    }

    /// The curve for altitude key index `i`
    pub fn curve(&self, i: usize) -> &ReferenceCurve<f64> {
        &self.curves[i]
    }

    pub fn altitude_bracket(&self, elevation: f64) -> Result<Bracket, PerformanceError> {
        self.altitudes.select(elevation)
    }
}

/// Minimum-go speed against runway length, one curve per weight and density-ratio row.
#[derive(Debug, Clone)]
pub struct MinGoTable {
    weights: BracketAxis,
    density_ratios: BracketAxis,
    /// Indexed `[weight][density ratio row]`
    curves: Vec<Vec<ReferenceCurve<f64>>>,
}

impl MinGoTable {
    /// # Errors
    /// * If weight or runway keys are not numeric and distinct
    /// * If the density-ratio rows are not strictly descending
    /// * If a weight is missing a runway column, or a column has the wrong number of rows
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PerformanceError> {
        let json: MinGoJson = serde_json::from_reader(reader)?;
        Self::from_json(json)
    }

    pub fn from_json_str(s: &str) -> Result<Self, PerformanceError> {
        let json: MinGoJson = serde_json::from_str(s)?;
        Self::from_json(json)
    }

    fn from_json(json: MinGoJson) -> Result<Self, PerformanceError> {
        let density_ratios =
            BracketAxis::new(Axis::DensityRatio, json.density_ratio, KeyOrder::Descending)?;
        let nrows = density_ratios.keys().len();
        let runway = json.runway_length;

        let (weight_keys, tables) = sorted_columns(Axis::Weight, json.weights)?;
        let weights = BracketAxis::new(Axis::Weight, weight_keys, KeyOrder::Ascending)?;

        let mut curves = Vec::with_capacity(tables.len());
        for (&weight, table) in weights.keys().iter().zip(tables) {
            let (lengths, columns) = sorted_columns(Axis::RunwayLength, table)?;
            if lengths != runway {
                return Err(PerformanceError::table(format!(
                    "weight {weight}: runway columns {lengths:?} do not match {runway:?}"
                )));
            }
            if let Some(bad) = columns.iter().position(|c| c.len() != nrows) {
                return Err(PerformanceError::table(format!(
                    "weight {weight}, runway {}: expected {nrows} rows, found {}",
                    lengths[bad],
                    columns[bad].len()
                )));
            }

            // Columns hold one runway length each; curves run along a row
            let rows = (0..nrows)
                .map(|r| {
                    let samples = columns.iter().map(|c| c[r]).collect();
                    ReferenceCurve::new(runway.clone(), samples)
                })
                .collect::<Result<Vec<_>, _>>()?;
            curves.push(rows);
        }

        debug!(
            "loaded minimum-go table: {} weights x {} density ratios x {} runway lengths",
            curves.len(),
            nrows,
            runway.len()
        );
        Ok(Self {
            weights,
            density_ratios,
            curves,
        })
    }

    pub fn weights(&self) -> &BracketAxis {
        &self.weights
    }

    pub fn density_ratios(&self) -> &BracketAxis {
        &self.density_ratios
    }

    /// Runway lengths at which every curve is sampled
    pub fn runway_lengths(&self) -> &[f64] {
        self.curves[0][0].grid()
    }

    /// The curve for weight key index `weight` and density-ratio row index `row`
    pub fn curve(&self, weight: usize, row: usize) -> &ReferenceCurve<f64> {
        &self.curves[weight][row]
    }

    pub fn weight_bracket(&self, weight: f64) -> Result<Bracket, PerformanceError> {
        self.weights.select(weight)
    }

    pub fn density_ratio_bracket(&self, density_ratio: f64) -> Result<Bracket, PerformanceError> {
        self.density_ratios.select(density_ratio)
    }
}

/// Both reference datasets
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub density_ratio: DensityRatioTable,
    pub min_go: MinGoTable,
}

impl ReferenceTables {
    /// The tables compiled into the crate.
    pub fn embedded() -> Result<Self, PerformanceError> {
        Self::from_json_str(EMBEDDED_DENSITY_RATIO, EMBEDDED_MIN_GO)
    }

    pub fn from_json_str(density_ratio: &str, min_go: &str) -> Result<Self, PerformanceError> {
        Ok(Self {
            density_ratio: DensityRatioTable::from_json_str(density_ratio)?,
            min_go: MinGoTable::from_json_str(min_go)?,
        })
    }

    pub fn from_readers<R1: Read, R2: Read>(
        density_ratio: R1,
        min_go: R2,
    ) -> Result<Self, PerformanceError> {
        Ok(Self {
            density_ratio: DensityRatioTable::from_reader(density_ratio)?,
            min_go: MinGoTable::from_reader(min_go)?,
        })
    }
}
