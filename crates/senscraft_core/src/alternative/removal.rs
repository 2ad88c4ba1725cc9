use ndarray::{Array2, Axis};
use tracing::debug;

use crate::error::{Result, SensitivityError};
use crate::model::{AlternativeRemoval, Indexes};
use crate::validator;

/// Copy of `matrix` without the listed positions along `axis`.
pub(crate) fn drop_indices(matrix: &Array2<f64>, axis: Axis, removed: &[usize]) -> Array2<f64> {
    let kept: Vec<usize> = (0..matrix.len_of(axis))
        .filter(|i| !removed.contains(i))
        .collect();
    matrix.select(axis, &kept)
}

/// Remove alternatives (rows) from the decision matrix.
///
/// With `Indexes::All` every alternative is removed once, on its own. A group
/// spec removes its members together in one scenario.
pub fn remove_alternatives(
    matrix: &Array2<f64>,
    indexes: &Indexes,
) -> Result<Vec<AlternativeRemoval>> {
    validator::check_not_empty("matrix", matrix)?;
    let specs = indexes.resolve("indexes", matrix.nrows())?;

    let results = specs
        .into_iter()
        .map(|spec| {
            if spec.indices().len() >= matrix.nrows() {
                return Err(SensitivityError::calculation(
                    format!("{:?}", spec.indices()),
                    "removal would leave no alternatives",
                ));
            }
            let new_matrix = drop_indices(matrix, Axis(0), spec.indices());
            Ok(AlternativeRemoval {
                removed: spec,
                matrix: new_matrix,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(scenarios = results.len(), "alternative removal generated");
    Ok(results)
}
