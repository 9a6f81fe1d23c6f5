use super::vocabulary::DesignSmell;
use serde::{Deserialize, Serialize};

/// Presence flags for the six design smells of one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmellFlags([bool; 6]);

impl SmellFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags with exactly the given smells set.
    pub fn with(smells: &[DesignSmell]) -> Self {
        let mut flags = Self::default();
        for smell in smells {
            flags.set(*smell, true);
        }
        flags
    }

    pub fn get(&self, smell: DesignSmell) -> bool {
        self.0[smell.index()]
    }

    pub fn set(&mut self, smell: DesignSmell, value: bool) {
        self.0[smell.index()] = value;
    }

    /// True when at least one smell is present.
    pub fn any(&self) -> bool {
        self.0.iter().any(|flag| *flag)
    }

    /// Column-wise maximum of two flag sets.
    ///
    /// Used when collapsing duplicate rows: a smell is present if any of the
    /// duplicates reported it.
    pub fn merge_max(self, other: SmellFlags) -> SmellFlags {
        let mut merged = self;
        for smell in DesignSmell::ALL {
            merged.set(smell, self.get(smell).max(other.get(smell)));
        }
        merged
    }

    /// Smells that are present, in report order.
    pub fn present(&self) -> impl Iterator<Item = DesignSmell> + '_ {
        DesignSmell::ALL.into_iter().filter(|smell| self.get(*smell))
    }
}

/// One normalized row of a security-scan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityRow {
    /// Canonical class key derived from the reported file path.
    pub name: String,
    /// First listed vulnerability class, if the scanner reported one.
    pub vulnerability_class: Option<String>,
    /// First listed CWE identifier.
    pub cwe: Option<String>,
}

impl VulnerabilityRow {
    pub fn new(name: impl Into<String>, vulnerability_class: Option<&str>) -> Self {
        Self {
            name: name.into(),
            vulnerability_class: vulnerability_class.map(str::to_string),
            cwe: None,
        }
    }
}

/// One analyzed class after joining the three project tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Canonical `package.Class` key, unique within a project.
    pub name: String,
    pub flags: SmellFlags,
    /// Label of the first scan row reported for this class.
    pub vulnerability: Option<String>,
    /// Every distinct label reported for this class, in first-seen order.
    pub vulnerability_classes: Vec<String>,
    /// Every distinct CWE reported for this class, in first-seen order.
    pub cwes: Vec<String>,
}

impl ClassRecord {
    /// The label the study consumes for this class.
    pub fn primary_vulnerability(&self) -> Option<&str> {
        self.vulnerability.as_deref()
    }

    pub fn is_flawed(&self) -> bool {
        self.flags.any()
    }

    pub fn is_vulnerable(&self) -> bool {
        self.vulnerability.is_some()
    }
}

/// All joined classes of one codebase together with its scan rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDataset {
    pub project: String,
    /// Joined classes sorted by name.
    pub classes: Vec<ClassRecord>,
    /// Every scan row, duplicates included.
    pub vulnerability_rows: Vec<VulnerabilityRow>,
    /// First scan row per class key.
    pub unique_vulnerability_rows: Vec<VulnerabilityRow>,
}

impl ProjectDataset {
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn flawed_classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.iter().filter(|class| class.is_flawed())
    }
}

/// Raw row of the design-smell table, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSmellRow {
    pub name: String,
    pub flags: SmellFlags,
}

/// Raw row of the security-scan table, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawScanRow {
    pub path: Option<String>,
    pub vulnerability_class: Option<String>,
    pub cwe: Option<String>,
}

impl RawScanRow {
    pub fn new(path: &str, vulnerability_class: Option<&str>) -> Self {
        Self {
            path: Some(path.to_string()),
            vulnerability_class: vulnerability_class.map(str::to_string),
            ..Self::default()
        }
    }
}

/// The three input tables of one project, as loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct ProjectTables {
    pub design_smells: Vec<RawSmellRow>,
    pub scan_results: Vec<RawScanRow>,
    /// Raw paths listed by the scanner as analyzed.
    pub scanned_files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_max_keeps_any_true_flag() {
        let a = SmellFlags::with(&[DesignSmell::GodClass]);
        let b = SmellFlags::with(&[DesignSmell::DataClass]);
        let merged = a.merge_max(b);
        assert!(merged.get(DesignSmell::GodClass));
        assert!(merged.get(DesignSmell::DataClass));
        assert!(!merged.get(DesignSmell::BrainClass));
    }

    #[test]
    fn test_any_is_false_for_clean_class() {
        assert!(!SmellFlags::new().any());
        assert!(SmellFlags::with(&[DesignSmell::FeatureEnvy]).any());
    }

    #[test]
    fn test_primary_vulnerability() {
        let record = ClassRecord {
            name: "web.Login".into(),
            flags: SmellFlags::new(),
            vulnerability: Some("SQL Injection".into()),
            vulnerability_classes: vec!["SQL Injection".into(), "Path Traversal".into()],
            cwes: vec!["CWE-89".into()],
        };
        assert_eq!(record.primary_vulnerability(), Some("SQL Injection"));
        assert!(record.is_vulnerable());
    }
}
