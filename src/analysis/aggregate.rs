//! Running totals across the projects of a study.
//!
//! Percentages are averaged with equal weight per project, regardless of how
//! many classes each project contributes.

use super::combine::{CombinedPair, PValueCollector};
use super::occurrence::{OccurrenceMatrix, SmellCounts};
use super::ProjectAnalysis;
use crate::core::DesignSmell;
use crate::errors::{Result, StudyError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PercentageAverages {
    pub code_smell_percentage: f64,
    pub flawed_percentage: f64,
    pub vulnerable_flawed_percentage: f64,
}

/// Accumulator fed once per project, in project order.
#[derive(Debug, Clone, Default)]
pub struct AggregateReport {
    project_count: usize,
    smell_totals: SmellCounts,
    occurrence_totals: OccurrenceMatrix,
    class_total: usize,
    vulnerability_total: usize,
    percentage_sums: PercentageAverages,
    p_values: PValueCollector,
}

impl AggregateReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_count(&self) -> usize {
        self.project_count
    }

    /// Fold one project's results into the running totals.
    pub fn add_project(&mut self, analysis: &ProjectAnalysis) {
        self.project_count += 1;
        self.smell_totals.add(&analysis.occurrences.smell_counts);
        self.occurrence_totals.add(&analysis.occurrences.matrix);
        self.class_total += analysis.class_count;
        self.vulnerability_total += analysis.vulnerability_count;

        let sums = &mut self.percentage_sums;
        sums.code_smell_percentage += analysis.percentages.code_smell_percentage;
        sums.flawed_percentage += analysis.percentages.flawed_percentage;
        sums.vulnerable_flawed_percentage += analysis.percentages.vulnerable_flawed_percentage;

        for (smell, category, p_value) in analysis.independence.p_values() {
            self.p_values.push(smell, category, p_value);
        }
    }

    /// Divide the percentage sums by the project count and combine the
    /// collected p-values.
    pub fn finalize(self) -> Result<StudySummary> {
        if self.project_count == 0 {
            return Err(StudyError::insufficient_data(
                "no project was analyzed successfully",
            ));
        }

        let n = self.project_count as f64;
        let averages = PercentageAverages {
            code_smell_percentage: self.percentage_sums.code_smell_percentage / n,
            flawed_percentage: self.percentage_sums.flawed_percentage / n,
            vulnerable_flawed_percentage: self.percentage_sums.vulnerable_flawed_percentage / n,
        };

        let mean_occurrences = DesignSmell::ALL
            .map(|smell| (smell, self.occurrence_totals.column_mean(smell)))
            .to_vec();

        Ok(StudySummary {
            project_count: self.project_count,
            smell_totals: self.smell_totals,
            occurrence_totals: self.occurrence_totals,
            mean_occurrences,
            class_total: self.class_total,
            vulnerability_total: self.vulnerability_total,
            averages,
            combined_p_values: self.p_values.combine_all(),
        })
    }
}

/// Final, read-only view of a study handed to the writers.
#[derive(Debug, Clone, Serialize)]
pub struct StudySummary {
    pub project_count: usize,
    pub smell_totals: SmellCounts,
    pub occurrence_totals: OccurrenceMatrix,
    /// Mean count per category of each smell's column in the summed matrix.
    pub mean_occurrences: Vec<(DesignSmell, f64)>,
    pub class_total: usize,
    pub vulnerability_total: usize,
    pub averages: PercentageAverages,
    pub combined_p_values: Vec<CombinedPair>,
}
