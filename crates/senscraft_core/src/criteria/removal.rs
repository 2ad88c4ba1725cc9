use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use crate::alternative::drop_indices;
use crate::combinations::{self, CombinationSource};
use crate::error::{Result, SensitivityError};
use crate::model::{CriteriaRemoval, IndexSpec, Indexes, ScenarioSet, criteria_label};
use crate::validator;

/// Criteria kept at minimum by default in combination removal
pub const DEFAULT_KEPT_CRITERIA: usize = 3;

fn remove_columns(
    matrix: &Array2<f64>,
    weights: &Array1<f64>,
    spec: IndexSpec,
) -> Result<CriteriaRemoval> {
    let removed = spec.indices();
    if removed.len() >= weights.len() {
        return Err(SensitivityError::calculation(
            format!("{removed:?}"),
            "removal would leave no criteria",
        ));
    }

    let removed_mass: f64 = removed.iter().map(|&c| weights[c]).sum();
    let kept: Vec<usize> = (0..weights.len()).filter(|c| !removed.contains(c)).collect();
    let share = removed_mass / kept.len() as f64;
    let new_weights = weights.select(Axis(0), &kept).mapv(|w| w + share);
    let total = new_weights.sum();
    if total <= 0.0 {
        return Err(SensitivityError::calculation(
            format!("{removed:?}"),
            "remaining weights sum to zero",
        ));
    }

    Ok(CriteriaRemoval {
        matrix: drop_indices(matrix, Axis(1), removed),
        weights: new_weights / total,
        removed: spec,
    })
}

fn check_inputs(matrix: &Array2<f64>, weights: &Array1<f64>) -> Result<()> {
    validator::check_not_empty("matrix", matrix)?;
    validator::check_weights(weights)?;
    validator::check_len("weights", weights.len(), matrix.ncols())
}

/// Remove criteria (columns) and redistribute their weight.
///
/// The removed mass is split equally across the remaining criteria and the
/// result renormalized. With `Indexes::All` each criterion is removed once.
pub fn remove_criteria(
    matrix: &Array2<f64>,
    weights: &Array1<f64>,
    indexes: &Indexes,
) -> Result<Vec<CriteriaRemoval>> {
    check_inputs(matrix, weights)?;
    let specs = indexes.resolve("indexes", matrix.ncols())?;

    let results = specs
        .into_iter()
        .map(|spec| remove_columns(matrix, weights, spec))
        .collect::<Result<Vec<_>>>()?;
    debug!(scenarios = results.len(), "criteria removal generated");
    Ok(results)
}

/// Remove criteria combinations, keyed `C[c1-c2-...]`.
///
/// Without an explicit source, every subset of two or more criteria is
/// removed as long as [`DEFAULT_KEPT_CRITERIA`] criteria remain.
pub fn criteria_removal_scenarios(
    matrix: &Array2<f64>,
    weights: &Array1<f64>,
    source: Option<&CombinationSource>,
) -> Result<ScenarioSet<CriteriaRemoval>> {
    check_inputs(matrix, weights)?;
    let default_source = CombinationSource::All {
        reserve: DEFAULT_KEPT_CRITERIA,
    };
    let combos = match source.unwrap_or(&default_source) {
        CombinationSource::PerEntity(_) => {
            return Err(SensitivityError::invalid(
                "combinations",
                "criteria removal takes one combination list for the whole matrix",
            ));
        }
        other => combinations::per_entity(1, weights.len(), other)?
            .into_iter()
            .flat_map(|(_, combos)| combos)
            .collect::<Vec<_>>(),
    };

    let mut scenarios = ScenarioSet::new();
    for combo in combos {
        let label = criteria_label(&combo);
        scenarios.insert(label, remove_columns(matrix, weights, IndexSpec::Group(combo))?);
    }
    debug!(scenarios = scenarios.len(), "criteria combination removal generated");
    Ok(scenarios)
}
