//! Per-project failure collection for a study batch.
//!
//! Each project is processed independently: a project that cannot be loaded
//! or analyzed is recorded here and the batch moves on to the next one.

use serde::Serialize;

/// Results of a batch where every project is processed independently.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResults<T> {
    pub successes: Vec<T>,
    pub failures: Vec<ProjectFailure>,
}

impl<T> Default for BatchResults<T> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchResults<T> {
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn total_count(&self) -> usize {
        self.success_count() + self.failure_count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A project that was dropped from the batch.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectFailure {
    pub project: String,
    pub stage: ProjectStage,
    pub error: String,
}

impl ProjectFailure {
    pub fn new(project: impl Into<String>, stage: ProjectStage, error: &anyhow::Error) -> Self {
        Self {
            project: project.into(),
            stage,
            error: format!("{:#}", error),
        }
    }
}

/// Pipeline stage at which a project failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProjectStage {
    Load,
    Join,
    Percentages,
}

impl ProjectStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "Load",
            Self::Join => "Join",
            Self::Percentages => "Percentages",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_batch_results_counts() {
        let results = BatchResults {
            successes: vec![1, 2],
            failures: vec![ProjectFailure::new(
                "CXF",
                ProjectStage::Load,
                &anyhow!("file not found"),
            )],
        };

        assert_eq!(results.success_count(), 2);
        assert_eq!(results.failure_count(), 1);
        assert_eq!(results.total_count(), 3);
        assert!(!results.is_complete_success());
    }

    #[test]
    fn test_failure_keeps_context_chain() {
        let error = anyhow!("missing column 'path'").context("loading scanned files");
        let failure = ProjectFailure::new("Solr", ProjectStage::Load, &error);
        assert!(failure.error.contains("loading scanned files"));
        assert!(failure.error.contains("missing column 'path'"));
    }
}
