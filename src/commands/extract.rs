//! Conversion of a semgrep JSON report into the two scan tables the study
//! reads: findings (`<stem>_results.csv`) and scanned files
//! (`<stem>_scanned.csv`).

use crate::config::DEFAULT_DELIMITER;
use crate::io;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const RESULT_COLUMNS: [&str; 6] = [
    "path",
    "source",
    "cwe",
    "owasp",
    "reference",
    "vulnerability_class",
];

#[derive(Debug, Default, Deserialize)]
pub struct SemgrepReport {
    #[serde(default)]
    pub results: Vec<SemgrepFinding>,
    #[serde(default)]
    pub paths: SemgrepPaths,
}

#[derive(Debug, Default, Deserialize)]
pub struct SemgrepPaths {
    #[serde(default)]
    pub scanned: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SemgrepFinding {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub extra: FindingExtra,
}

#[derive(Debug, Default, Deserialize)]
pub struct FindingExtra {
    #[serde(default)]
    pub metadata: FindingMetadata,
}

#[derive(Debug, Default, Deserialize)]
pub struct FindingMetadata {
    #[serde(default)]
    pub source: MetadataValue,
    #[serde(default)]
    pub cwe: MetadataValue,
    #[serde(default)]
    pub owasp: MetadataValue,
    #[serde(default)]
    pub references: MetadataValue,
    #[serde(default)]
    pub vulnerability_class: MetadataValue,
}

/// A rule metadata entry; rules write most keys as lists but some as a
/// single string.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    #[default]
    Missing,
    One(String),
    Many(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

impl MetadataValue {
    /// The scalar value, or the first element of a list.
    pub fn first(&self) -> String {
        match self {
            MetadataValue::One(value) => value.clone(),
            MetadataValue::Many(values) => values
                .first()
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .unwrap_or_default(),
            MetadataValue::Missing | MetadataValue::Other(_) => String::new(),
        }
    }
}

impl SemgrepFinding {
    /// One row of the results table, in [`RESULT_COLUMNS`] order.
    pub fn to_row(&self) -> [String; 6] {
        let metadata = &self.extra.metadata;
        [
            self.path.clone().unwrap_or_default(),
            metadata.source.first(),
            metadata.cwe.first(),
            metadata.owasp.first(),
            metadata.references.first(),
            metadata.vulnerability_class.first(),
        ]
    }
}

pub struct ExtractConfig {
    pub input: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub delimiter: Option<char>,
}

/// Paths of the two tables written for `input`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTables {
    pub results: PathBuf,
    pub scanned: PathBuf,
    pub finding_count: usize,
    pub scanned_count: usize,
}

pub fn parse_report(contents: &str) -> Result<SemgrepReport> {
    serde_json::from_str(contents).context("Failed to parse semgrep JSON report")
}

pub fn extract_report(
    report: &SemgrepReport,
    stem: &str,
    output_dir: &Path,
    delimiter: u8,
) -> Result<ExtractedTables> {
    io::ensure_dir(output_dir)?;

    let results = output_dir.join(format!("{stem}_results.csv"));
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(&results)
        .with_context(|| format!("Failed to create {}", results.display()))?;
    writer.write_record(RESULT_COLUMNS)?;
    for finding in &report.results {
        writer.write_record(finding.to_row())?;
    }
    writer.flush()?;

    let scanned = output_dir.join(format!("{stem}_scanned.csv"));
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(&scanned)
        .with_context(|| format!("Failed to create {}", scanned.display()))?;
    writer.write_record(["path"])?;
    for path in &report.paths.scanned {
        writer.write_record([path])?;
    }
    writer.flush()?;

    Ok(ExtractedTables {
        results,
        scanned,
        finding_count: report.results.len(),
        scanned_count: report.paths.scanned.len(),
    })
}

pub fn handle_extract(config: ExtractConfig) -> Result<()> {
    let delimiter = config.delimiter.unwrap_or(DEFAULT_DELIMITER);
    if !delimiter.is_ascii() {
        anyhow::bail!("delimiter '{}' must be a single ASCII character", delimiter);
    }

    let contents = fs::read_to_string(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;
    let report = parse_report(&contents)?;

    let stem = config
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("semgrep");
    let output_dir = config
        .output_dir
        .clone()
        .or_else(|| config.input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let tables = extract_report(&report, stem, &output_dir, delimiter as u8)?;
    println!(
        "Wrote {} finding(s) to {}",
        tables.finding_count,
        tables.results.display()
    );
    println!(
        "Wrote {} scanned file(s) to {}",
        tables.scanned_count,
        tables.scanned.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::io::{load_scan_results, load_scanned_files};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const REPORT: &str = indoc! {r#"
        {
          "results": [
            {
              "path": "src/main/java/org/app/web/Login.java",
              "extra": {
                "metadata": {
                  "source": "https://semgrep.dev/r/sqli",
                  "cwe": ["CWE-89: SQL Injection"],
                  "owasp": ["A03:2021 - Injection"],
                  "references": ["https://owasp.org"],
                  "vulnerability_class": ["SQL Injection"]
                }
              }
            },
            {
              "path": "src/main/java/org/app/web/Admin.java",
              "extra": {}
            }
          ],
          "paths": {
            "scanned": [
              "src/main/java/org/app/web/Login.java",
              "src/main/java/org/app/web/Admin.java"
            ]
          }
        }
    "#};

    #[test]
    fn test_missing_metadata_becomes_empty_fields() {
        let report = parse_report(REPORT).unwrap();
        assert_eq!(report.results.len(), 2);
        assert_eq!(
            report.results[1].to_row(),
            [
                "src/main/java/org/app/web/Admin.java".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_extracted_tables_load_back() {
        let dir = TempDir::new().unwrap();
        let report = parse_report(REPORT).unwrap();
        let tables = extract_report(&report, "tomcat", dir.path(), b';').unwrap();

        assert_eq!(tables.results, dir.path().join("tomcat_results.csv"));
        assert_eq!(tables.finding_count, 2);

        let rows = load_scan_results(&tables.results, &InputConfig::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].vulnerability_class.as_deref(), Some("SQL Injection"));
        assert_eq!(rows[0].cwe.as_deref(), Some("CWE-89: SQL Injection"));
        assert_eq!(rows[1].vulnerability_class, None);

        let scanned = load_scanned_files(&tables.scanned, b';').unwrap();
        assert_eq!(scanned.len(), 2);
    }

    #[test]
    fn test_scalar_metadata_is_taken_as_is() {
        let report = parse_report(indoc! {r#"
            {
              "results": [
                {
                  "path": "src/a/B.java",
                  "extra": {
                    "metadata": {
                      "cwe": "CWE-89: SQL Injection",
                      "owasp": "A03:2021 - Injection",
                      "references": 42,
                      "vulnerability_class": ["SQL Injection", "Improper Validation"]
                    }
                  }
                }
              ]
            }
        "#})
        .unwrap();
        assert_eq!(
            report.results[0].to_row(),
            [
                "src/a/B.java".to_string(),
                String::new(),
                "CWE-89: SQL Injection".to_string(),
                "A03:2021 - Injection".to_string(),
                String::new(),
                "SQL Injection".to_string(),
            ]
        );
    }

    #[test]
    fn test_null_metadata_becomes_empty_field() {
        let report = parse_report(
            r#"{"results":[{"path":"src/a/B.java","extra":{"metadata":{"cwe":null,"owasp":[]}}}]}"#,
        )
        .unwrap();
        let row = report.results[0].to_row();
        assert_eq!(row[2], "");
        assert_eq!(row[3], "");
    }

    #[test]
    fn test_empty_report_is_accepted() {
        let report = parse_report("{}").unwrap();
        assert!(report.results.is_empty());
        assert!(report.paths.scanned.is_empty());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(parse_report("not json").is_err());
    }
}
