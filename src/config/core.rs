use crate::io::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DELIMITER: char = ';';
pub const DEFAULT_VULNERABILITY_COLUMN: &str = "extra.metadata.vulnerability_class.0";

/// Root configuration of a study (`study.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StudyConfig {
    /// How the input tables are laid out
    #[serde(default)]
    pub input: InputConfig,

    /// Report format and chart destination
    #[serde(default)]
    pub output: OutputConfig,

    /// Projects in processing order
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Field delimiter shared by every input table
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Column of the scan table holding the first vulnerability class
    #[serde(default = "default_vulnerability_column")]
    pub vulnerability_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            vulnerability_column: default_vulnerability_column(),
        }
    }
}

impl InputConfig {
    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // Validation guarantees an ASCII delimiter.
        self.delimiter as u8
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Directory receiving the SVG charts; no charts when absent
    #[serde(default)]
    pub charts_dir: Option<PathBuf>,
}

/// Input tables of one codebase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    pub name: String,
    pub design_smells: PathBuf,
    pub scan_results: PathBuf,
    pub scanned_files: PathBuf,
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_vulnerability_column() -> String {
    DEFAULT_VULNERABILITY_COLUMN.to_string()
}
