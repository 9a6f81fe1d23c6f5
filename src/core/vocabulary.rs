//! Fixed vocabularies shared by every project in a study.
//!
//! Report columns and matrix rows are always laid out in the order defined
//! here, regardless of which smells or categories a given project exhibits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Design smells reported by the design-smell detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DesignSmell {
    #[serde(rename = "God_Class")]
    GodClass,
    #[serde(rename = "Complex_Class")]
    ComplexClass,
    #[serde(rename = "Large_Class")]
    LargeClass,
    #[serde(rename = "Data_Class")]
    DataClass,
    #[serde(rename = "Feature_Envy")]
    FeatureEnvy,
    #[serde(rename = "Brain_Class")]
    BrainClass,
}

impl DesignSmell {
    /// All smells in report order.
    pub const ALL: [DesignSmell; 6] = [
        DesignSmell::GodClass,
        DesignSmell::ComplexClass,
        DesignSmell::LargeClass,
        DesignSmell::DataClass,
        DesignSmell::FeatureEnvy,
        DesignSmell::BrainClass,
    ];

    /// Column header used by the design-smell table.
    pub const fn column_name(self) -> &'static str {
        match self {
            DesignSmell::GodClass => "God_Class",
            DesignSmell::ComplexClass => "Complex_Class",
            DesignSmell::LargeClass => "Large_Class",
            DesignSmell::DataClass => "Data_Class",
            DesignSmell::FeatureEnvy => "Feature_Envy",
            DesignSmell::BrainClass => "Brain_Class",
        }
    }

    /// Position of the smell in [`DesignSmell::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DesignSmell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for DesignSmell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DesignSmell::ALL
            .into_iter()
            .find(|smell| smell.column_name() == s.trim())
            .ok_or_else(|| format!("unknown design smell '{}'", s))
    }
}

/// Vulnerability categories tallied in the occurrence matrix.
///
/// Lexicographically sorted, which is also the order in which per-category
/// indicators are tested.
pub const VULNERABILITY_CATEGORIES: [&str; 12] = [
    "Active Debug Code",
    "Cookie Security",
    "Cross-Site Request Forgery (CSRF)",
    "Cross-Site-Scripting (XSS)",
    "Cryptographic Issues",
    "Hard-coded Secrets",
    "Improper Validation",
    "Insecure Hashing Algorithm",
    "Mishandled Sensitive Information",
    "Path Traversal",
    "SQL Injection",
    "XML Injection",
];

/// Index of `category` in [`VULNERABILITY_CATEGORIES`], if it belongs to it.
pub fn category_index(category: &str) -> Option<usize> {
    VULNERABILITY_CATEGORIES
        .iter()
        .position(|known| *known == category)
}
