//! Vulnerable / flawed class ratios of one project.

use crate::core::ProjectDataset;
use crate::errors::{Result, StudyError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectPercentages {
    /// Joined classes carrying at least one design smell.
    pub flawed_count: usize,
    /// Distinct scan-row keys over joined classes.
    pub code_smell_percentage: f64,
    /// Flawed classes over joined classes.
    pub flawed_percentage: f64,
    /// Scan rows landing in a flawed class over all scan rows.
    pub vulnerable_flawed_percentage: f64,
}

/// Compute the three percentage metrics of a joined project.
///
/// Fails with [`StudyError::InsufficientData`] when the project has no
/// joined classes or no scan rows.
pub fn compute_percentages(dataset: &ProjectDataset) -> Result<ProjectPercentages> {
    let class_count = dataset.class_count();
    if class_count == 0 {
        return Err(StudyError::insufficient_data(format!(
            "project '{}' has no joined classes",
            dataset.project
        )));
    }

    let vulnerability_rows = dataset.vulnerability_rows.len();
    if vulnerability_rows == 0 {
        return Err(StudyError::insufficient_data(format!(
            "project '{}' has no scan rows",
            dataset.project
        )));
    }

    let flawed: HashSet<&str> = dataset
        .flawed_classes()
        .map(|class| class.name.as_str())
        .collect();
    let flawed_count = flawed.len();

    let vulnerable_flawed_rows = dataset
        .vulnerability_rows
        .iter()
        .filter(|row| flawed.contains(row.name.as_str()))
        .count();

    let code_smell_percentage =
        ratio(dataset.unique_vulnerability_rows.len(), class_count);
    if code_smell_percentage > 100.0 {
        log::warn!(
            "{}: {} distinct scan keys exceed {} joined classes",
            dataset.project,
            dataset.unique_vulnerability_rows.len(),
            class_count
        );
    }

    Ok(ProjectPercentages {
        flawed_count,
        code_smell_percentage,
        flawed_percentage: ratio(flawed_count, class_count),
        vulnerable_flawed_percentage: ratio(vulnerable_flawed_rows, vulnerability_rows),
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassRecord, DesignSmell, SmellFlags, VulnerabilityRow};

    fn class(name: &str, smells: &[DesignSmell], vulnerability: Option<&str>) -> ClassRecord {
        ClassRecord {
            name: name.to_string(),
            flags: SmellFlags::with(smells),
            vulnerability: vulnerability.map(str::to_string),
            vulnerability_classes: vulnerability.into_iter().map(str::to_string).collect(),
            cwes: Vec::new(),
        }
    }

    fn dataset() -> ProjectDataset {
        let rows = vec![
            VulnerabilityRow::new("p.C1", Some("SQL Injection")),
            VulnerabilityRow::new("p.C1", Some("SQL Injection")),
            VulnerabilityRow::new("p.C4", Some("Cross-Site-Scripting (XSS)")),
        ];
        ProjectDataset {
            project: "A".into(),
            classes: vec![
                class("p.C1", &[DesignSmell::GodClass], Some("SQL Injection")),
                class("p.C2", &[], None),
                class("p.C3", &[DesignSmell::GodClass], None),
                class("p.C4", &[], Some("Cross-Site-Scripting (XSS)")),
            ],
            unique_vulnerability_rows: vec![rows[0].clone(), rows[2].clone()],
            vulnerability_rows: rows,
        }
    }

    #[test]
    fn test_percentages() {
        let result = compute_percentages(&dataset()).unwrap();
        assert_eq!(result.flawed_count, 2);
        assert_eq!(result.flawed_percentage, 50.0);
        assert_eq!(result.code_smell_percentage, 50.0);
        // Two of the three scan rows belong to C1, which has a smell.
        assert!((result.vulnerable_flawed_percentage - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_project_is_insufficient() {
        let empty = ProjectDataset {
            project: "empty".into(),
            ..ProjectDataset::default()
        };
        assert!(matches!(
            compute_percentages(&empty),
            Err(StudyError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_no_scan_rows_is_insufficient() {
        let mut data = dataset();
        data.vulnerability_rows.clear();
        data.unique_vulnerability_rows.clear();
        assert!(matches!(
            compute_percentages(&data),
            Err(StudyError::InsufficientData(_))
        ));
    }
}
