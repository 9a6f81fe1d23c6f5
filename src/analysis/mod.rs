//! The study pipeline: normalize, join, measure, test, aggregate.

pub mod aggregate;
pub mod combine;
pub mod contingency;
pub mod independence;
pub mod join;
pub mod normalize;
pub mod occurrence;
pub mod percentages;
pub mod stats;

pub use aggregate::{AggregateReport, PercentageAverages, StudySummary};
pub use combine::{fisher_combine, CombinedPValue, CombinedPair, PValueCollector, PValueSeries};
pub use contingency::{chi_squared_test, ChiSquaredResult, ContingencyTable};
pub use independence::{
    analyze_independence, any_smell_test, IndependenceReport, PairTest, SkipReason, TestOutcome,
};
pub use join::join_tables;
pub use normalize::{canonical_key, normalize_scanner_path, normalize_smell_name, NameSource};
pub use occurrence::{compute_occurrences, OccurrenceMatrix, OccurrenceTable, SmellCounts};
pub use percentages::{compute_percentages, ProjectPercentages};

use crate::core::{ClassRecord, ProjectDataset};
use crate::errors::Result;
use serde::Serialize;

/// Significance threshold for every chi-squared test.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Everything computed for one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectAnalysis {
    pub project: String,
    pub class_count: usize,
    /// Scan rows, duplicates included.
    pub vulnerability_count: usize,
    pub unique_vulnerability_count: usize,
    pub percentages: ProjectPercentages,
    pub occurrences: OccurrenceTable,
    pub independence: IndependenceReport,
    pub any_smell: TestOutcome,
    /// Joined classes with at least one vulnerability label, by name.
    pub vulnerable_classes: Vec<ClassRecord>,
}

/// Run the per-project statistics on an already joined dataset.
pub fn analyze_project(dataset: &ProjectDataset) -> Result<ProjectAnalysis> {
    let percentages = compute_percentages(dataset)?;

    Ok(ProjectAnalysis {
        project: dataset.project.clone(),
        class_count: dataset.class_count(),
        vulnerability_count: dataset.vulnerability_rows.len(),
        unique_vulnerability_count: dataset.unique_vulnerability_rows.len(),
        percentages,
        occurrences: compute_occurrences(dataset),
        independence: analyze_independence(dataset),
        any_smell: any_smell_test(dataset),
        vulnerable_classes: dataset
            .classes
            .iter()
            .filter(|class| !class.vulnerability_classes.is_empty())
            .cloned()
            .collect(),
    })
}
