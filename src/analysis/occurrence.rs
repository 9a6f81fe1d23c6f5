//! Design-smell tallies and the category x smell cross-tabulation.

use crate::core::{category_index, DesignSmell, ProjectDataset, VULNERABILITY_CATEGORIES};
use serde::{Deserialize, Serialize};

/// Number of classes flagged with each design smell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmellCounts(pub [usize; 6]);

impl SmellCounts {
    pub fn get(&self, smell: DesignSmell) -> usize {
        self.0[smell.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DesignSmell, usize)> + '_ {
        DesignSmell::ALL.into_iter().map(|smell| (smell, self.get(smell)))
    }

    pub fn add(&mut self, other: &SmellCounts) {
        for (total, count) in self.0.iter_mut().zip(other.0) {
            *total += count;
        }
    }
}

/// Rows are [`VULNERABILITY_CATEGORIES`], columns are [`DesignSmell::ALL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceMatrix(pub [[usize; 6]; 12]);

impl OccurrenceMatrix {
    pub fn get(&self, category: usize, smell: DesignSmell) -> usize {
        self.0[category][smell.index()]
    }

    pub fn add(&mut self, other: &OccurrenceMatrix) {
        for (row, other_row) in self.0.iter_mut().zip(other.0.iter()) {
            for (cell, count) in row.iter_mut().zip(other_row) {
                *cell += count;
            }
        }
    }

    /// Mean count of `smell` over the twelve categories.
    pub fn column_mean(&self, smell: DesignSmell) -> f64 {
        let sum: usize = self.0.iter().map(|row| row[smell.index()]).sum();
        sum as f64 / VULNERABILITY_CATEGORIES.len() as f64
    }

    /// Category name paired with its row of counts.
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, &[usize; 6])> + '_ {
        VULNERABILITY_CATEGORIES.iter().copied().zip(self.0.iter())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceTable {
    pub smell_counts: SmellCounts,
    pub matrix: OccurrenceMatrix,
}

/// Tally smells and their vulnerability categories over the joined classes.
///
/// A flagged class contributes to the matrix cell of its primary label;
/// labels outside the fixed vocabulary contribute to no cell.
pub fn compute_occurrences(dataset: &ProjectDataset) -> OccurrenceTable {
    let mut table = OccurrenceTable::default();

    for class in &dataset.classes {
        let category = class.primary_vulnerability().and_then(category_index);
        for smell in class.flags.present() {
            table.smell_counts.0[smell.index()] += 1;
            if let Some(row) = category {
                table.matrix.0[row][smell.index()] += 1;
            }
        }
    }

    table
}
