//! Loading of the three per-project input tables.
//!
//! All tables are delimiter-separated with a header row. Columns that the
//! study does not consume are ignored.

use crate::config::{InputConfig, ProjectConfig};
use crate::core::{DesignSmell, ProjectTables, RawScanRow, RawSmellRow, SmellFlags};
use crate::errors::{Result, StudyError};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Deserializer};
use std::path::Path;

const PATH_COLUMNS: [&str; 1] = ["path"];
const VULNERABILITY_ALIASES: [&str; 1] = ["vulnerability_class"];
const CWE_COLUMNS: [&str; 2] = ["extra.metadata.cwe.0", "cwe"];

#[derive(Debug, Deserialize)]
struct SmellRecord {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "God_Class", default, deserialize_with = "deserialize_flag")]
    god_class: bool,
    #[serde(rename = "Complex_Class", default, deserialize_with = "deserialize_flag")]
    complex_class: bool,
    #[serde(rename = "Large_Class", default, deserialize_with = "deserialize_flag")]
    large_class: bool,
    #[serde(rename = "Data_Class", default, deserialize_with = "deserialize_flag")]
    data_class: bool,
    #[serde(rename = "Feature_Envy", default, deserialize_with = "deserialize_flag")]
    feature_envy: bool,
    #[serde(rename = "Brain_Class", default, deserialize_with = "deserialize_flag")]
    brain_class: bool,
}

impl SmellRecord {
    fn flags(&self) -> SmellFlags {
        let mut flags = SmellFlags::new();
        flags.set(DesignSmell::GodClass, self.god_class);
        flags.set(DesignSmell::ComplexClass, self.complex_class);
        flags.set(DesignSmell::LargeClass, self.large_class);
        flags.set(DesignSmell::DataClass, self.data_class);
        flags.set(DesignSmell::FeatureEnvy, self.feature_envy);
        flags.set(DesignSmell::BrainClass, self.brain_class);
        flags
    }
}

/// Parse a smell flag cell; blanks count as absent.
pub fn parse_flag(raw: &str) -> std::result::Result<bool, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(false);
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" => return Ok(true),
        "false" | "no" => return Ok(false),
        _ => {}
    }
    raw.parse::<f64>()
        .map(|value| value > 0.0)
        .map_err(|_| format!("'{}' is not a smell flag", raw))
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    parse_flag(raw.as_deref().unwrap_or("")).map_err(serde::de::Error::custom)
}

fn reader(path: &Path, delimiter: u8) -> Result<csv::Reader<std::fs::File>> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| StudyError::table(path, e.to_string()))
}

fn headers(reader: &mut csv::Reader<std::fs::File>, path: &Path) -> Result<StringRecord> {
    reader
        .headers()
        .cloned()
        .map_err(|e| StudyError::table(path, e.to_string()))
}

fn column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|candidate| headers.iter().position(|header| header == *candidate))
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Load the design-smell report.
///
/// Rows without any value are dropped; smell columns missing from the
/// header are treated as all-absent.
pub fn load_design_smells(path: &Path, delimiter: u8) -> Result<Vec<RawSmellRow>> {
    let mut reader = reader(path, delimiter)?;
    let headers = headers(&mut reader, path)?;

    if column(&headers, &["Name"]).is_none() {
        return Err(StudyError::table(path, "missing column 'Name'"));
    }
    for smell in DesignSmell::ALL {
        if column(&headers, &[smell.column_name()]).is_none() {
            log::warn!(
                "{}: no '{}' column, treating it as absent",
                path.display(),
                smell.column_name()
            );
        }
    }

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| StudyError::table(path, e.to_string()))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let parsed: SmellRecord = record.deserialize(Some(&headers)).map_err(|e| {
            StudyError::table(path, format!("row {}: {}", line + 2, e))
        })?;
        match parsed.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => rows.push(RawSmellRow {
                name: name.to_string(),
                flags: parsed.flags(),
            }),
            _ => log::debug!("{}: row {} has no name, skipping", path.display(), line + 2),
        }
    }
    Ok(rows)
}

/// Load the security-scan report.
pub fn load_scan_results(path: &Path, input: &InputConfig) -> Result<Vec<RawScanRow>> {
    let mut reader = reader(path, input.delimiter_byte())?;
    let headers = headers(&mut reader, path)?;

    let path_index = column(&headers, &PATH_COLUMNS)
        .ok_or_else(|| StudyError::table(path, "missing column 'path'"))?;

    let mut vulnerability_columns = vec![input.vulnerability_column.as_str()];
    vulnerability_columns.extend(VULNERABILITY_ALIASES);
    let vulnerability_index = column(&headers, &vulnerability_columns).ok_or_else(|| {
        StudyError::table(
            path,
            format!("missing column '{}'", input.vulnerability_column),
        )
    })?;

    let cwe_index = column(&headers, &CWE_COLUMNS);

    reader
        .records()
        .map(|result| {
            let record = result.map_err(|e| StudyError::table(path, e.to_string()))?;
            Ok(RawScanRow {
                path: cell(&record, Some(path_index)),
                vulnerability_class: cell(&record, Some(vulnerability_index)),
                cwe: cell(&record, cwe_index),
            })
        })
        .collect()
}

/// Load the scanner's list of analyzed files.
///
/// Reads the `path` column, or the first column when there is none.
pub fn load_scanned_files(path: &Path, delimiter: u8) -> Result<Vec<String>> {
    let mut reader = reader(path, delimiter)?;
    let headers = headers(&mut reader, path)?;
    let index = column(&headers, &PATH_COLUMNS).unwrap_or(0);

    let mut files = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| StudyError::table(path, e.to_string()))?;
        if let Some(value) = cell(&record, Some(index)) {
            files.push(value);
        }
    }
    Ok(files)
}

/// Load the three tables of `project`.
pub fn load_project_tables(project: &ProjectConfig, input: &InputConfig) -> Result<ProjectTables> {
    let delimiter = input.delimiter_byte();
    Ok(ProjectTables {
        design_smells: load_design_smells(&project.design_smells, delimiter)?,
        scan_results: load_scan_results(&project.scan_results, input)?,
        scanned_files: load_scanned_files(&project.scanned_files, delimiter)?,
    })
}
