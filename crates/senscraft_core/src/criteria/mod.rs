//! Criteria weight scenarios
//!
//! Covers weight modification (discrete, range, percentage), criterion
//! removal, greedy relevance identification, and exhaustive weight grids.
//!
//! Weight outputs always sum to one: targeted weights take their new values,
//! the mass difference is spread equally over the untargeted weights, and
//! the vector is renormalized. Scenarios pushing any weight outside `[0, 1]`
//! are infeasible.

mod discrete;
mod identification;
mod percentage;
mod range;
mod removal;
mod scenarios;

pub use discrete::*;
pub use identification::*;
pub use percentage::*;
pub use range::*;
pub use removal::*;
pub use scenarios::*;

use ndarray::Array1;

use crate::combinations::cartesian_product;
use crate::model::{Change, IndexSpec, WeightScenario};

/// Slack allowed for floating-point error at the `[0, 1]` bounds
const FEASIBILITY_TOL: f64 = 1e-12;

/// Set `targets` to `new_values` and rebalance the remaining weights.
///
/// Returns `None` when the result would leave `[0, 1]`.
pub(crate) fn rebalance(
    weights: &Array1<f64>,
    targets: &[usize],
    new_values: &[f64],
) -> Option<Array1<f64>> {
    let mut new_weights = weights.clone();
    let mut delta = 0.0;
    for (&idx, &value) in targets.iter().zip(new_values) {
        delta += weights[idx] - value;
        new_weights[idx] = value;
    }

    let others = weights.len() - targets.len();
    if others > 0 {
        let share = delta / others as f64;
        for (idx, w) in new_weights.iter_mut().enumerate() {
            if !targets.contains(&idx) {
                *w += share;
            }
        }
    }

    if new_weights
        .iter()
        .any(|w| !(-FEASIBILITY_TOL..=1.0 + FEASIBILITY_TOL).contains(w))
    {
        return None;
    }
    new_weights.mapv_inplace(|w| w.clamp(0.0, 1.0));
    let total = new_weights.sum();
    if total <= 0.0 {
        return None;
    }
    Some(new_weights / total)
}

/// How candidate values turn into target weights
#[derive(Clone, Copy)]
enum CandidateKind {
    /// Candidates are absolute weight values
    Absolute,
    /// Candidates are signed fractional changes of the current weight
    Relative,
}

/// Expand per-criterion candidates into rebalanced weight scenarios.
///
/// Relative candidates on a single index stop after the first infeasible
/// change in the same direction; everything else skips infeasible entries.
fn expand_weights<'a>(
    weights: &Array1<f64>,
    specs: &[IndexSpec],
    candidates: impl Fn(usize) -> &'a [f64],
    kind: CandidateKind,
) -> Vec<WeightScenario> {
    let target_value = |crit: usize, candidate: f64| match kind {
        CandidateKind::Absolute => candidate,
        CandidateKind::Relative => weights[crit] + weights[crit] * candidate,
    };

    let mut results = Vec::new();
    for spec in specs {
        let crits = spec.indices();
        let tuples: Vec<Vec<f64>> = match spec {
            IndexSpec::Single(c) => candidates(*c).iter().map(|v| vec![*v]).collect(),
            IndexSpec::Group(_) => {
                let lists: Vec<&[f64]> = crits.iter().map(|&c| candidates(c)).collect();
                cartesian_product(&lists)
            }
        };

        let mut blocked = [false, false];
        for tuple in tuples {
            let sign_slot = usize::from(tuple[0] >= 0.0);
            let stops = matches!(kind, CandidateKind::Relative) && !spec.is_group();
            if stops && blocked[sign_slot] {
                continue;
            }

            let new_values: Vec<f64> = crits
                .iter()
                .zip(&tuple)
                .map(|(&c, &v)| target_value(c, v))
                .collect();
            match rebalance(weights, crits, &new_values) {
                Some(new_weights) => results.push(WeightScenario {
                    criteria: spec.clone(),
                    change: Change::for_spec(spec, &tuple),
                    weights: new_weights,
                }),
                None if stops => blocked[sign_slot] = true,
                None => {}
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
    fn test_rebalance_spreads_difference() {
        let weights = array![0.3, 0.3, 0.4];
        let new = rebalance(&weights, &[0], &[0.2]).unwrap();
        assert!((new[0] - 0.2).abs() < 1e-12);
        assert!((new[1] - 0.35).abs() < 1e-12);
        assert!((new[2] - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_rebalance_rejects_negative() {
        let weights = array![0.8, 0.1, 0.1];
        assert!(rebalance(&weights, &[1], &[0.5]).is_none());
    }

    #[test]
    fn test_rebalance_all_targeted_normalizes() {
        let weights = array![0.5, 0.5];
        let new = rebalance(&weights, &[0, 1], &[0.2, 0.6]).unwrap();
        assert!((new[0] - 0.25).abs() < 1e-12);
        assert!((new.sum() - 1.0).abs() < 1e-12);
    }
}
