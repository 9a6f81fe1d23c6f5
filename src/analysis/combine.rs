//! Fisher's method for combining p-values of the same pair across projects.

use super::stats::chi_squared_sf;
use crate::core::DesignSmell;
use crate::errors::{Result, StudyError};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombinedPValue {
    /// `-2 * sum(ln p)`.
    pub statistic: f64,
    pub p_value: f64,
    /// Number of p-values combined; the statistic has `2 * n` degrees of freedom.
    pub count: usize,
}

/// Combine independent p-values with Fisher's method.
///
/// Every p-value must be finite and lie in `(0, 1]`. Zero is rejected rather
/// than clamped since `ln 0` is undefined.
pub fn fisher_combine(p_values: &[f64]) -> Result<CombinedPValue> {
    if p_values.is_empty() {
        return Err(StudyError::invalid_input("no p-values to combine"));
    }
    if let Some((index, p)) = p_values
        .iter()
        .enumerate()
        .find(|(_, p)| !(p.is_finite() && **p > 0.0 && **p <= 1.0))
    {
        return Err(StudyError::invalid_input(format!(
            "p-value {} at index {} is outside (0, 1]",
            p, index
        )));
    }

    let statistic = -2.0 * p_values.iter().map(|p| p.ln()).sum::<f64>();
    let dof = 2 * p_values.len();

    Ok(CombinedPValue {
        statistic,
        p_value: chi_squared_sf(statistic, dof as f64),
        count: p_values.len(),
    })
}

/// p-values of one (smell, category) pair collected across projects, in
/// project order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PValueSeries {
    pub smell: DesignSmell,
    pub category: String,
    pub p_values: Vec<f64>,
}

/// Series keyed by (smell, category), ordered by smell then category.
#[derive(Debug, Clone, Default)]
pub struct PValueCollector {
    series: BTreeMap<(DesignSmell, String), Vec<f64>>,
}

impl PValueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, smell: DesignSmell, category: &str, p_value: f64) {
        self.series
            .entry((smell, category.to_string()))
            .or_default()
            .push(p_value);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series(&self) -> impl Iterator<Item = PValueSeries> + '_ {
        self.series
            .iter()
            .map(|((smell, category), p_values)| PValueSeries {
                smell: *smell,
                category: category.clone(),
                p_values: p_values.clone(),
            })
    }

    /// Combine every series; a series with invalid input keeps its error
    /// message instead of a result.
    pub fn combine_all(&self) -> Vec<CombinedPair> {
        self.series()
            .map(|series| {
                let outcome = fisher_combine(&series.p_values).map_err(|err| {
                    log::warn!(
                        "cannot combine p-values for {} x {}: {}",
                        series.smell,
                        series.category,
                        err
                    );
                    err.to_string()
                });
                CombinedPair { series, outcome }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedPair {
    pub series: PValueSeries,
    pub outcome: std::result::Result<CombinedPValue, String>,
}
