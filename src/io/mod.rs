pub mod charts;
pub mod output;
pub mod tables;
pub mod writers;

pub use charts::{write_charts, BarChart, ChartError};
pub use output::{create_writer, OutputFormat, OutputWriter, StudyReport};
pub use tables::{load_project_tables, load_scan_results, load_scanned_files, load_design_smells};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
