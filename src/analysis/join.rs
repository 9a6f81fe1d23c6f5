//! Joins the three per-project tables into one row per analyzed class.
//!
//! The population is the intersection of the scanner's file list and the
//! design-smell report; scan findings are attached afterwards and never add
//! or remove classes.

use super::normalize::{normalize_scanner_path, normalize_smell_name};
use crate::core::{
    ClassRecord, ProjectDataset, ProjectTables, RawScanRow, RawSmellRow, SmellFlags,
    VulnerabilityRow,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Collapse design-smell rows sharing a canonical key.
///
/// Flags are reduced with [`SmellFlags::merge_max`]. Rows whose name
/// normalizes to an empty key are dropped.
pub fn collapse_smell_rows(rows: &[RawSmellRow]) -> BTreeMap<String, SmellFlags> {
    let mut collapsed: BTreeMap<String, SmellFlags> = BTreeMap::new();
    for row in rows {
        let key = normalize_smell_name(&row.name);
        if key.is_empty() {
            continue;
        }
        collapsed
            .entry(key)
            .and_modify(|flags| *flags = flags.merge_max(row.flags))
            .or_insert(row.flags);
    }
    collapsed
}

/// Canonical keys of the scanner's file list.
pub fn scanned_keys(paths: &[String]) -> BTreeSet<String> {
    paths
        .iter()
        .map(|path| normalize_scanner_path(Some(path)))
        .filter(|key| !key.is_empty())
        .collect()
}

/// Normalize every scan row, keeping duplicates and their order.
pub fn normalize_scan_rows(rows: &[RawScanRow]) -> Vec<VulnerabilityRow> {
    rows.iter()
        .map(|row| VulnerabilityRow {
            name: normalize_scanner_path(row.path.as_deref()),
            vulnerability_class: non_blank(row.vulnerability_class.as_deref()),
            cwe: non_blank(row.cwe.as_deref()),
        })
        .collect()
}

/// First row per class key, in input order.
pub fn first_per_name(rows: &[VulnerabilityRow]) -> Vec<VulnerabilityRow> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.name.as_str()))
        .cloned()
        .collect()
}

/// Build the joined dataset of one project.
pub fn join_tables(project: &str, tables: &ProjectTables) -> ProjectDataset {
    let smells = collapse_smell_rows(&tables.design_smells);
    let scanned = scanned_keys(&tables.scanned_files);
    let vulnerability_rows = normalize_scan_rows(&tables.scan_results);
    let unique_vulnerability_rows = first_per_name(&vulnerability_rows);

    let primary: HashMap<&str, Option<&str>> = unique_vulnerability_rows
        .iter()
        .map(|row| (row.name.as_str(), row.vulnerability_class.as_deref()))
        .collect();

    let labels = distinct_per_name(&vulnerability_rows, |row| row.vulnerability_class.as_deref());
    let cwes = distinct_per_name(&vulnerability_rows, |row| row.cwe.as_deref());

    let classes: Vec<ClassRecord> = smells
        .into_iter()
        .filter(|(name, _)| scanned.contains(name))
        .map(|(name, flags)| ClassRecord {
            vulnerability: primary
                .get(name.as_str())
                .copied()
                .flatten()
                .map(str::to_string),
            vulnerability_classes: labels.get(name.as_str()).cloned().unwrap_or_default(),
            cwes: cwes.get(name.as_str()).cloned().unwrap_or_default(),
            flags,
            name,
        })
        .collect();

    log::debug!(
        "{}: {} smell keys, {} scanned keys, {} joined classes, {} scan rows ({} unique)",
        project,
        tables.design_smells.len(),
        scanned.len(),
        classes.len(),
        vulnerability_rows.len(),
        unique_vulnerability_rows.len()
    );

    ProjectDataset {
        project: project.to_string(),
        classes,
        vulnerability_rows,
        unique_vulnerability_rows,
    }
}

/// Distinct values of `field` per class key, in first-seen order.
fn distinct_per_name<'a>(
    rows: &'a [VulnerabilityRow],
    field: impl Fn(&'a VulnerabilityRow) -> Option<&'a str>,
) -> HashMap<&'a str, Vec<String>> {
    let mut values: HashMap<&str, Vec<String>> = HashMap::new();
    for row in rows {
        if let Some(value) = field(row) {
            let entry = values.entry(row.name.as_str()).or_default();
            if !entry.iter().any(|seen| seen == value) {
                entry.push(value.to_string());
            }
        }
    }
    values
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
