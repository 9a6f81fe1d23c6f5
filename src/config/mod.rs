//! Study configuration: which projects to analyze and how their tables look.

pub mod core;
pub mod loader;

pub use self::core::{
    InputConfig, OutputConfig, ProjectConfig, StudyConfig, DEFAULT_DELIMITER,
    DEFAULT_VULNERABILITY_COLUMN,
};
pub use loader::{load_config, parse_and_validate_config, validate_config};
