use ndarray::Array1;
use tracing::debug;

use super::{CandidateKind, expand_weights};
use crate::error::Result;
use crate::model::{Indexes, WeightScenario};
use crate::validator;

/// Try each candidate weight for the selected criteria.
///
/// `values[c]` lists the weights to try for criterion `c`; groups combine
/// their members' lists. Infeasible candidates are skipped.
pub fn discrete_modification(
    weights: &Array1<f64>,
    values: &[Vec<f64>],
    indexes: &Indexes,
) -> Result<Vec<WeightScenario>> {
    validator::check_weights(weights)?;
    validator::check_len("discrete_values", values.len(), weights.len())?;
    for candidate in values.iter().flatten() {
        validator::check_in_range("discrete_values", *candidate, 0.0, 1.0)?;
    }
    let specs = indexes.resolve("indexes", weights.len())?;

    let results = expand_weights(weights, &specs, |c| &values[c], CandidateKind::Absolute);
    debug!(scenarios = results.len(), "weights discrete modification generated");
    Ok(results)
}
