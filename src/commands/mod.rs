//! CLI command implementations.
//!
//! Available commands:
//! - **analyze**: Run the design smell / vulnerability study over a batch of projects
//! - **extract**: Convert a semgrep JSON report into the scan tables
//! - **init**: Write a `study.toml` template

pub mod analyze;
pub mod extract;
pub mod init;

pub use analyze::{build_report, handle_analyze, process_project, run_study, AnalyzeConfig};
pub use extract::{handle_extract, ExtractConfig};
pub use init::init_config;
