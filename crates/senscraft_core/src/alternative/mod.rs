//! Decision-matrix scenarios
//!
//! Modifies performance values of alternatives (discrete substitution,
//! range sweeps, percentage changes) or removes alternatives entirely.
//!
//! Every generated matrix is a fresh copy; the input is never mutated.

mod discrete;
mod percentage;
mod range;
mod removal;

pub use discrete::*;
pub use percentage::*;
pub use range::*;
pub use removal::*;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::combinations::cartesian_product;
use crate::error::Result;
use crate::model::{Change, ColumnParam, IndexSpec, Indexes, MatrixScenario};

/// A matrix modification selected at runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatrixModification {
    Discrete(CandidateValues),
    Range {
        bounds: RangeBounds,
        step: ColumnParam,
    },
    Percentage {
        percentages: ColumnParam,
        direction: Option<Vec<i8>>,
        step: ColumnParam,
    },
}

impl MatrixModification {
    pub fn apply(&self, matrix: &Array2<f64>, indexes: &Indexes) -> Result<Vec<MatrixScenario>> {
        match self {
            MatrixModification::Discrete(values) => discrete_modification(matrix, values, indexes),
            MatrixModification::Range { bounds, step } => {
                range_modification(matrix, bounds, indexes, step)
            }
            MatrixModification::Percentage {
                percentages,
                direction,
                step,
            } => percentage_modification(matrix, percentages, direction.as_deref(), indexes, step),
        }
    }
}

/// Substitute candidate values for each alternative and index spec.
///
/// `candidates(alt, crit)` yields the value list for one cell; groups take the
/// Cartesian product of their members' lists.
fn substitute_cells<'a>(
    matrix: &Array2<f64>,
    specs: &[IndexSpec],
    candidates: impl Fn(usize, usize) -> &'a [f64],
) -> Vec<MatrixScenario> {
    let mut results = Vec::new();

    for alt in 0..matrix.nrows() {
        for spec in specs {
            let cols = spec.indices();
            let lists: Vec<&[f64]> = cols.iter().map(|&c| candidates(alt, c)).collect();
            let tuples: Vec<Vec<f64>> = match spec {
                IndexSpec::Single(_) => lists[0].iter().map(|v| vec![*v]).collect(),
                IndexSpec::Group(_) => cartesian_product(&lists),
            };

            for values in tuples {
                let mut new_matrix = matrix.clone();
                for (&col, &value) in cols.iter().zip(&values) {
                    new_matrix[[alt, col]] = value;
                }
                results.push(MatrixScenario {
                    alternative: alt,
                    criteria: spec.clone(),
                    change: Change::for_spec(spec, &values),
                    matrix: new_matrix,
                });
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_strategy_dispatch_matches_direct_call() {
        let matrix = array![[4.0, 1.0, 6.0], [2.0, 6.0, 3.0]];
        let bounds = RangeBounds::PerColumn(vec![(3.0, 5.0), (1.0, 2.0), (6.0, 6.0)]);
        let step = ColumnParam::Uniform(1.0);

        let via_enum = MatrixModification::Range {
            bounds: bounds.clone(),
            step: step.clone(),
        }
        .apply(&matrix, &Indexes::All)
        .unwrap();
        let direct = range_modification(&matrix, &bounds, &Indexes::All, &step).unwrap();
        assert_eq!(via_enum, direct);
        assert_eq!(via_enum.len(), 2 * (3 + 2 + 1));
    }
}
