use ndarray::Array1;
use tracing::debug;

use super::{CandidateKind, expand_weights};
use crate::error::Result;
use crate::model::{ColumnParam, Indexes, WeightScenario, stepped_range};
use crate::validator;

/// Default weight sweep step
pub const DEFAULT_WEIGHT_STEP: f64 = 0.01;

/// Sweep weights across `[lower, upper]` per criterion.
///
/// Bounds must lie within `[0, 1]`. Scenarios that would push another weight
/// outside `[0, 1]` are skipped.
pub fn range_modification(
    weights: &Array1<f64>,
    bounds: &[(f64, f64)],
    indexes: &Indexes,
    step: &ColumnParam,
) -> Result<Vec<WeightScenario>> {
    validator::check_weights(weights)?;
    let n = weights.len();
    validator::check_len("range_values", bounds.len(), n)?;
    step.check_positive("step", n)?;
    for &(lower, upper) in bounds {
        validator::check_bounds("range_values", (lower, upper))?;
        validator::check_in_range("range_values", lower, 0.0, 1.0)?;
        validator::check_in_range("range_values", upper, 0.0, 1.0)?;
    }
    let specs = indexes.resolve("indexes", n)?;

    let candidates: Vec<Vec<f64>> = bounds
        .iter()
        .enumerate()
        .map(|(c, &(lower, upper))| stepped_range(lower, upper, step.get(c)))
        .collect();

    let results = expand_weights(weights, &specs, |c| &candidates[c], CandidateKind::Absolute);
    debug!(scenarios = results.len(), "weights range modification generated");
    Ok(results)
}
