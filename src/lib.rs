// Export modules for library usage
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;

// Re-export commonly used types
pub use crate::core::{
    ClassRecord, DesignSmell, ProjectDataset, ProjectTables, SmellFlags, VulnerabilityRow,
    VULNERABILITY_CATEGORIES,
};

pub use crate::analysis::{
    analyze_project, chi_squared_test, fisher_combine, join_tables, normalize_scanner_path,
    normalize_smell_name, AggregateReport, ChiSquaredResult, ContingencyTable, ProjectAnalysis,
    StudySummary,
};

pub use crate::config::{load_config, StudyConfig};
pub use crate::errors::{StudyError, Result};
