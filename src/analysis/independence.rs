//! Per-project chi-squared tests for every (design smell, category) pair.
//!
//! Each observed vulnerability label becomes a one-hot indicator over the
//! joined classes. Pairs whose smell column or indicator is constant carry
//! no information and are skipped rather than tested.

use super::contingency::{chi_squared_test, ChiSquaredResult, ContingencyTable};
use crate::core::{ClassRecord, DesignSmell, ProjectDataset};
use serde::Serialize;
use std::collections::BTreeSet;

/// Why a pair produced no p-value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The smell column or the category indicator takes a single value.
    InsufficientData {
        smell_values: usize,
        category_values: usize,
    },
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            Self::InsufficientData {
                smell_values,
                category_values,
            } => format!(
                "insufficient data ({} smell value(s), {} category value(s))",
                smell_values, category_values
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Tested(ChiSquaredResult),
    Skipped(SkipReason),
}

impl TestOutcome {
    pub fn result(&self) -> Option<&ChiSquaredResult> {
        match self {
            Self::Tested(result) => Some(result),
            Self::Skipped(_) => None,
        }
    }
}

/// Outcome of one (smell, category) test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairTest {
    pub smell: DesignSmell,
    pub category: String,
    pub outcome: TestOutcome,
}

/// All pair tests of one project, grouped by smell in report order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndependenceReport {
    pub tests: Vec<PairTest>,
}

impl IndependenceReport {
    /// Completed tests for `smell`, in category order.
    pub fn results_for(
        &self,
        smell: DesignSmell,
    ) -> impl Iterator<Item = (&str, &ChiSquaredResult)> + '_ {
        self.tests
            .iter()
            .filter(move |test| test.smell == smell)
            .filter_map(|test| test.outcome.result().map(|r| (test.category.as_str(), r)))
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&PairTest, &SkipReason)> + '_ {
        self.tests.iter().filter_map(|test| match &test.outcome {
            TestOutcome::Skipped(reason) => Some((test, reason)),
            TestOutcome::Tested(_) => None,
        })
    }

    /// `(smell, category, p-value)` of every completed test.
    pub fn p_values(&self) -> impl Iterator<Item = (DesignSmell, &str, f64)> + '_ {
        self.tests.iter().filter_map(|test| {
            test.outcome
                .result()
                .map(|result| (test.smell, test.category.as_str(), result.p_value))
        })
    }
}

/// Distinct primary labels of the joined classes, sorted.
pub fn observed_categories(dataset: &ProjectDataset) -> BTreeSet<String> {
    dataset
        .classes
        .iter()
        .filter_map(ClassRecord::primary_vulnerability)
        .map(str::to_string)
        .collect()
}

/// Test one smell against the indicator of one category.
pub fn test_pair(classes: &[ClassRecord], smell: DesignSmell, category: &str) -> TestOutcome {
    test_indicators(classes.iter().map(|class| {
        (
            class.flags.get(smell),
            class.primary_vulnerability() == Some(category),
        )
    }))
}

/// Test two binary indicators observed on the same classes.
///
/// Two boolean indicators always fill a 2x2 table, so the table falls short
/// of 2x2 only when one indicator is constant.
pub fn test_indicators(observations: impl Iterator<Item = (bool, bool)>) -> TestOutcome {
    let table = ContingencyTable::from_observations(observations);
    match chi_squared_test(&table) {
        Ok(result) => TestOutcome::Tested(result),
        Err(err) => {
            log::debug!("{}", err);
            let (smell_values, category_values) = table.shape();
            TestOutcome::Skipped(SkipReason::InsufficientData {
                smell_values,
                category_values,
            })
        }
    }
}

/// Run every (smell, observed category) test of a project.
pub fn analyze_independence(dataset: &ProjectDataset) -> IndependenceReport {
    let categories = observed_categories(dataset);
    let mut tests = Vec::with_capacity(DesignSmell::ALL.len() * categories.len());

    for smell in DesignSmell::ALL {
        for category in &categories {
            let outcome = test_pair(&dataset.classes, smell, category);
            match &outcome {
                TestOutcome::Skipped(reason) => {
                    log::info!(
                        "{}: skipping chi-squared test for {} and {}: {}",
                        dataset.project,
                        smell,
                        category,
                        reason.describe()
                    );
                }
                TestOutcome::Tested(result) => {
                    log::debug!(
                        "{}: {} x {}: chi2={:.4} p={:.4}",
                        dataset.project,
                        smell,
                        category,
                        result.statistic,
                        result.p_value
                    );
                }
            }
            tests.push(PairTest {
                smell,
                category: category.clone(),
                outcome,
            });
        }
    }

    IndependenceReport { tests }
}

/// Test "has any design smell" against "has any vulnerability".
pub fn any_smell_test(dataset: &ProjectDataset) -> TestOutcome {
    let outcome = test_indicators(
        dataset
            .classes
            .iter()
            .map(|class| (class.is_flawed(), class.is_vulnerable())),
    );
    if let TestOutcome::Skipped(reason) = &outcome {
        log::info!(
            "{}: skipping any-smell test: {}",
            dataset.project,
            reason.describe()
        );
    }
    outcome
}
