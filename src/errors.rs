//! Error taxonomy for the study pipeline.
//!
//! Statistical anomalies for a single (smell, category) pair are recovered
//! locally by the independence tester and never surface here as failures of
//! a whole project. Everything else propagates as [`StudyError`] and is
//! recorded per project by [`collection::BatchResults`].

pub mod collection;

pub use collection::{BatchResults, ProjectFailure, ProjectStage};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudyError {
    /// A denominator or marginal needed by a statistic is empty or constant.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A contingency table does not have the expected 2x2 shape.
    #[error("Malformed contingency table: {0}")]
    MalformedContingency(String),

    /// A value handed to a statistical routine is outside its domain.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The inner join of scanned files and design smells produced no rows.
    #[error("Join produced no classes for project '{project}'")]
    JoinMismatch { project: String },

    /// An input table could not be read or parsed.
    #[error("Failed to load table {}: {message}", path.display())]
    Table { path: PathBuf, message: String },

    /// The study configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StudyError {
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn table(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Table {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T, E = StudyError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_mentions_path() {
        let err = StudyError::table("tomcat/tomcat9.csv", "missing column 'Name'");
        let message = err.to_string();
        assert!(message.contains("tomcat/tomcat9.csv"));
        assert!(message.contains("missing column 'Name'"));
    }

    #[test]
    fn test_join_mismatch_names_project() {
        let err = StudyError::JoinMismatch {
            project: "Kafka".into(),
        };
        assert_eq!(err.to_string(), "Join produced no classes for project 'Kafka'");
    }
}
