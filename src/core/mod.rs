//! Domain types shared across the study pipeline.

pub mod types;
pub mod vocabulary;

pub use types::{
    ClassRecord, ProjectDataset, ProjectTables, RawScanRow, RawSmellRow, SmellFlags,
    VulnerabilityRow,
};
pub use vocabulary::{category_index, DesignSmell, VULNERABILITY_CATEGORIES};
