use ndarray::Array1;
use tracing::debug;

use super::{CandidateKind, expand_weights};
use crate::error::Result;
use crate::model::{ColumnParam, Indexes, WeightScenario, percentage_changes};
use crate::validator;

/// Change weights by percentages of their current value.
///
/// Each criterion gets thresholds `step, 2 * step, ... <= percentage`. Without
/// a direction every threshold yields a decrease then an increase; with
/// `direction[c]` only that sign is used. For a single index the sweep in a
/// direction stops at the first infeasible change; group tuples that are
/// infeasible are skipped.
pub fn percentage_modification(
    weights: &Array1<f64>,
    percentages: &ColumnParam,
    direction: Option<&[i8]>,
    indexes: &Indexes,
    step: &ColumnParam,
) -> Result<Vec<WeightScenario>> {
    validator::check_weights(weights)?;
    let n = weights.len();
    percentages.check_positive("percentages", n)?;
    step.check_positive("step", n)?;
    if let Some(direction) = direction {
        validator::check_len("direction", direction.len(), n)?;
        validator::check_directions("direction", direction)?;
    }
    let specs = indexes.resolve("indexes", n)?;

    let changes: Vec<Vec<f64>> = (0..n)
        .map(|c| percentage_changes(percentages.get(c), step.get(c), direction.map(|d| d[c])))
        .collect();

    let results = expand_weights(weights, &specs, |c| &changes[c], CandidateKind::Relative);
    debug!(scenarios = results.len(), "weights percentage modification generated");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Change, IndexSpec};
    use ndarray::array;

    fn weights() -> Array1<f64> {
        array![0.3, 0.3, 0.4]
    }

    fn assert_normalized(results: &[WeightScenario]) {
        for r in results {
            assert!((r.weights.sum() - 1.0).abs() < 1e-9, "sum {}", r.weights.sum());
        }
    }

    #[test]
    fn test_single_change() {
        let results =
            percentage_modification(&weights(), &5.0.into(), None, &Indexes::All, &1.0.into())
                .unwrap();
        assert_eq!(results[0].criteria, IndexSpec::Single(0));
        assert_eq!(results[0].change, Change::Value(-0.01));
        assert!((results[0].weights[0] - 0.297).abs() < 1e-12);
        assert_eq!(results.len(), 30);
        assert_normalized(&results);
    }

    #[test]
    fn test_grouped_indexes() {
        let indexes = Indexes::from(vec![IndexSpec::Group(vec![0, 1]), IndexSpec::Single(2)]);
        let results = percentage_modification(
            &weights(),
            &ColumnParam::PerColumn(vec![5.0, 5.0, 5.0]),
            None,
            &indexes,
            &1.0.into(),
        )
        .unwrap();
        assert_eq!(results[0].criteria, IndexSpec::Group(vec![0, 1]));
        assert_eq!(results[0].change, Change::Values(vec![-0.01, -0.01]));
        assert_normalized(&results);
    }

    #[test]
    fn test_direction() {
        let results = percentage_modification(
            &weights(),
            &ColumnParam::PerColumn(vec![6.0, 4.0, 5.0]),
            Some(&[-1, 1, -1]),
            &Indexes::All,
            &1.0.into(),
        )
        .unwrap();
        assert_eq!(results[0].change, Change::Value(-0.01));
        assert_eq!(results.len(), 6 + 4 + 5);
        assert_normalized(&results);
    }

    #[test]
    fn test_selected_indexes_with_step() {
        let results = percentage_modification(
            &weights(),
            &ColumnParam::PerColumn(vec![6.0, 4.0, 8.0]),
            None,
            &Indexes::from(vec![0, 2]),
            &2.0.into(),
        )
        .unwrap();
        assert_eq!(results[0].criteria, IndexSpec::Single(0));
        assert_eq!(results[0].change, Change::Value(-0.02));
        assert_normalized(&results);
    }

    #[test]
    fn test_infeasible_sweep_stops() {
        // Doubling criterion 0 or more would take more than 0.1 from each peer
        let weights = array![0.8, 0.1, 0.1];
        let results = percentage_modification(
            &weights,
            &300.0.into(),
            Some(&[1, 1, 1]),
            &Indexes::from(0),
            &100.0.into(),
        )
        .unwrap();
        assert!(results.is_empty());
    }
}
