//! 2x2 contingency tables and Pearson's chi-squared test of independence.

use super::stats::chi_squared_sf;
use crate::errors::{Result, StudyError};
use serde::{Deserialize, Serialize};

/// Counts of `[smell present, smell absent] x [category present, category absent]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyTable(pub [[u64; 2]; 2]);

impl ContingencyTable {
    /// Cross-tabulate `(has_smell, has_category)` observations.
    pub fn from_observations(observations: impl IntoIterator<Item = (bool, bool)>) -> Self {
        let mut table = Self::default();
        for (has_smell, has_category) in observations {
            table.0[usize::from(!has_smell)][usize::from(!has_category)] += 1;
        }
        table
    }

    pub fn total(&self) -> u64 {
        self.0.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> [u64; 2] {
        [self.0[0][0] + self.0[0][1], self.0[1][0] + self.0[1][1]]
    }

    pub fn column_totals(&self) -> [u64; 2] {
        [self.0[0][0] + self.0[1][0], self.0[0][1] + self.0[1][1]]
    }

    /// Realized shape: number of non-empty rows by non-empty columns.
    pub fn shape(&self) -> (usize, usize) {
        let non_empty = |totals: [u64; 2]| totals.iter().filter(|total| **total > 0).count();
        (non_empty(self.row_totals()), non_empty(self.column_totals()))
    }

    /// Expected counts under independence.
    pub fn expected(&self) -> [[f64; 2]; 2] {
        let rows = self.row_totals();
        let columns = self.column_totals();
        let total = self.total() as f64;
        let mut expected = [[0.0; 2]; 2];
        for (i, row) in expected.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = rows[i] as f64 * columns[j] as f64 / total;
            }
        }
        expected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquaredResult {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    pub observed: ContingencyTable,
    pub expected: [[f64; 2]; 2],
}

impl ChiSquaredResult {
    pub fn is_significant(&self) -> bool {
        self.p_value < super::SIGNIFICANCE_LEVEL
    }

    pub fn significance_label(&self) -> &'static str {
        if self.is_significant() {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Chi-squared test of independence on a 2x2 table.
///
/// With one degree of freedom, Yates' continuity correction moves every
/// observed count up to 0.5 towards its expected count before the
/// statistic is computed.
pub fn chi_squared_test(table: &ContingencyTable) -> Result<ChiSquaredResult> {
    let shape = table.shape();
    if shape != (2, 2) {
        return Err(StudyError::MalformedContingency(format!(
            "expected a 2x2 table, got {}x{}",
            shape.0, shape.1
        )));
    }

    let expected = table.expected();
    let mut statistic = 0.0;
    for i in 0..2 {
        for j in 0..2 {
            let observed = table.0[i][j] as f64;
            let diff = expected[i][j] - observed;
            let corrected = observed + diff.signum() * diff.abs().min(0.5);
            statistic += (corrected - expected[i][j]).powi(2) / expected[i][j];
        }
    }

    Ok(ChiSquaredResult {
        statistic,
        p_value: chi_squared_sf(statistic, 1.0),
        dof: 1,
        observed: *table,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_balanced_table_is_independent() {
        let table = ContingencyTable([[1, 1], [1, 1]]);
        let result = chi_squared_test(&table).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.significance_label(), "No");
    }

    #[test]
    fn test_yates_corrected_statistic() {
        // Expected counts are all 25; |O - E| = 15 shrinks to 14.5.
        let table = ContingencyTable([[40, 10], [10, 40]]);
        let result = chi_squared_test(&table).unwrap();
        let expected = 4.0 * 14.5_f64.powi(2) / 25.0;
        assert!((result.statistic - expected).abs() < 1e-9);
        assert!(result.is_significant());
    }

    #[test]
    fn test_small_deviation_is_fully_corrected() {
        // Every |O - E| is 1/3, so the corrected counts equal the expected ones.
        let table = ContingencyTable([[1, 1], [1, 0]]);
        let expected = table.expected();
        assert!((expected[1][1] - 1.0 / 3.0).abs() < 1e-12);
        let result = chi_squared_test(&table).unwrap();
        assert!(result.statistic.abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_shape_is_malformed() {
        let table = ContingencyTable([[3, 2], [0, 0]]);
        assert_eq!(table.shape(), (1, 2));
        assert!(matches!(
            chi_squared_test(&table),
            Err(StudyError::MalformedContingency(_))
        ));
    }

    #[test]
    fn test_from_observations_layout() {
        let table = ContingencyTable::from_observations([
            (true, true),
            (true, false),
            (false, true),
            (false, false),
            (false, false),
        ]);
        assert_eq!(table, ContingencyTable([[1, 1], [1, 2]]));
    }

    proptest! {
        #[test]
        fn cells_sum_to_population(observations in prop::collection::vec(any::<(bool, bool)>(), 0..200)) {
            let table = ContingencyTable::from_observations(observations.iter().copied());
            prop_assert_eq!(table.total(), observations.len() as u64);
        }

        #[test]
        fn p_value_is_a_probability(cells in prop::array::uniform4(1u64..500)) {
            let table = ContingencyTable([[cells[0], cells[1]], [cells[2], cells[3]]]);
            let result = chi_squared_test(&table).unwrap();
            prop_assert!(result.statistic >= 0.0);
            prop_assert!((0.0..=1.0).contains(&result.p_value));
        }
    }
}
