use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::substitute_cells;
use crate::error::Result;
use crate::model::{Indexes, MatrixScenario};
use crate::validator;

/// Candidate replacement values, ragged lists allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CandidateValues {
    /// One list per criterion, shared by every alternative
    PerColumn(Vec<Vec<f64>>),
    /// One list per alternative-criterion cell
    PerCell(Vec<Vec<Vec<f64>>>),
}

impl CandidateValues {
    pub(crate) fn check_against(&self, matrix: &Array2<f64>) -> Result<()> {
        match self {
            CandidateValues::PerColumn(columns) => {
                validator::check_len("discrete_values", columns.len(), matrix.ncols())
            }
            CandidateValues::PerCell(rows) => {
                validator::check_len("discrete_values", rows.len(), matrix.nrows())?;
                for row in rows {
                    validator::check_len("discrete_values", row.len(), matrix.ncols())?;
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn cell(&self, alt: usize, crit: usize) -> &[f64] {
        match self {
            CandidateValues::PerColumn(columns) => &columns[crit],
            CandidateValues::PerCell(rows) => &rows[alt][crit],
        }
    }
}

/// Replace matrix values with each candidate in turn.
///
/// For every alternative and every index spec, one scenario is produced per
/// candidate (single index) or per Cartesian-product tuple (group).
///
/// # Example
/// ```ignore
/// let values = CandidateValues::PerColumn(vec![vec![2.0, 3.0], vec![1.0], vec![3.0, 4.0]]);
/// let scenarios = discrete_modification(&matrix, &values, &Indexes::All)?;
/// ```
pub fn discrete_modification(
    matrix: &Array2<f64>,
    values: &CandidateValues,
    indexes: &Indexes,
) -> Result<Vec<MatrixScenario>> {
    validator::check_not_empty("matrix", matrix)?;
    values.check_against(matrix)?;
    let specs = indexes.resolve("indexes", matrix.ncols())?;

    let results = substitute_cells(matrix, &specs, |alt, crit| values.cell(alt, crit));
    debug!(scenarios = results.len(), "discrete modification generated");
    Ok(results)
}
