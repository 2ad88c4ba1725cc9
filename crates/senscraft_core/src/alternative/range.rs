use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CandidateValues, substitute_cells};
use crate::error::Result;
use crate::model::{ColumnParam, Indexes, MatrixScenario, stepped_range};
use crate::validator;

/// Inclusive `(lower, upper)` sweep bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RangeBounds {
    PerColumn(Vec<(f64, f64)>),
    PerCell(Vec<Vec<(f64, f64)>>),
}

impl RangeBounds {
    /// Expand bounds into stepped candidate lists
    fn candidates(&self, matrix: &Array2<f64>, step: &ColumnParam) -> Result<CandidateValues> {
        step.check_positive("step", matrix.ncols())?;
        let sweep = |crit: usize, bounds: (f64, f64)| -> Result<Vec<f64>> {
            validator::check_bounds("range_values", bounds)?;
            Ok(stepped_range(bounds.0, bounds.1, step.get(crit)))
        };

        let values = match self {
            RangeBounds::PerColumn(columns) => {
                validator::check_len("range_values", columns.len(), matrix.ncols())?;
                CandidateValues::PerColumn(
                    columns
                        .iter()
                        .enumerate()
                        .map(|(crit, b)| sweep(crit, *b))
                        .collect::<Result<_>>()?,
                )
            }
            RangeBounds::PerCell(rows) => {
                validator::check_len("range_values", rows.len(), matrix.nrows())?;
                let mut cells = Vec::with_capacity(rows.len());
                for row in rows {
                    validator::check_len("range_values", row.len(), matrix.ncols())?;
                    cells.push(
                        row.iter()
                            .enumerate()
                            .map(|(crit, b)| sweep(crit, *b))
                            .collect::<Result<Vec<_>>>()?,
                    );
                }
                CandidateValues::PerCell(cells)
            }
        };
        Ok(values)
    }
}

/// Sweep cell values across `[lower, upper]` with a fixed step.
///
/// Steps can be set globally or per criterion. Candidates that overshoot the
/// upper bound through step accumulation are dropped.
pub fn range_modification(
    matrix: &Array2<f64>,
    bounds: &RangeBounds,
    indexes: &Indexes,
    step: &ColumnParam,
) -> Result<Vec<MatrixScenario>> {
    validator::check_not_empty("matrix", matrix)?;
    let specs = indexes.resolve("indexes", matrix.ncols())?;
    let values = bounds.candidates(matrix, step)?;

    let results = substitute_cells(matrix, &specs, |alt, crit| values.cell(alt, crit));
    debug!(scenarios = results.len(), "range modification generated");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SensitivityError;
    use crate::model::{Change, IndexSpec};
    use ndarray::array;

    fn matrix() -> Array2<f64> {
        array![[4.0, 1.0, 6.0], [2.0, 6.0, 3.0], [9.0, 5.0, 7.0]]
    }

    fn per_column() -> RangeBounds {
        RangeBounds::PerColumn(vec![(6.0, 8.0), (2.0, 4.0), (4.0, 6.5)])
    }

    #[test]
    fn test_first_change_is_lower_bound() {
        let results =
            range_modification(&matrix(), &per_column(), &Indexes::All, &1.0.into()).unwrap();
        assert_eq!(results[0].alternative, 0);
        assert_eq!(results[0].change, Change::Value(6.0));
        // 3 + 3 + 3 candidates per alternative, 6.5 upper bound cuts at 6.0
        assert_eq!(results.len(), 3 * 9);
    }

    #[test]
    fn test_per_cell_bounds() {
        let bounds = RangeBounds::PerCell(vec![
            vec![(3.0, 5.0), (1.0, 2.0), (5.0, 7.0)],
            vec![(1.0, 3.0), (5.0, 7.0), (2.0, 4.0)],
            vec![(8.0, 9.0), (4.0, 6.0), (6.0, 8.0)],
        ]);
        let results = range_modification(&matrix(), &bounds, &Indexes::All, &1.0.into()).unwrap();
        assert_eq!(results[0].change, Change::Value(3.0));
    }

    #[test]
    fn test_grouped_indexes() {
        let indexes = Indexes::from(vec![IndexSpec::Group(vec![0, 2]), IndexSpec::Single(1)]);
        let results = range_modification(&matrix(), &per_column(), &indexes, &1.0.into()).unwrap();
        assert_eq!(results[0].criteria, IndexSpec::Group(vec![0, 2]));
        assert_eq!(results[0].change, Change::Values(vec![6.0, 4.0]));
    }

    #[test]
    fn test_fractional_and_per_column_steps() {
        let half =
            range_modification(&matrix(), &per_column(), &Indexes::All, &0.5.into()).unwrap();
        assert_eq!(half[0].change, Change::Value(6.0));
        assert_eq!(half[1].change, Change::Value(6.5));

        let step = ColumnParam::PerColumn(vec![0.25, 0.4, 0.5]);
        let per_col = range_modification(&matrix(), &per_column(), &Indexes::All, &step).unwrap();
        assert_eq!(per_col[0].change, Change::Value(6.0));
        assert_eq!(per_col[1].change, Change::Value(6.25));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let bounds = RangeBounds::PerColumn(vec![(8.0, 6.0), (2.0, 4.0), (4.0, 6.5)]);
        assert!(matches!(
            range_modification(&matrix(), &bounds, &Indexes::All, &1.0.into()),
            Err(SensitivityError::InvalidValue { .. })
        ));
    }
}
