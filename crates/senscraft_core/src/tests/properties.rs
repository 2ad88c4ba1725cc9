//! Property tests for scenario invariants
//!
//! These tests verify that:
//! - Weight scenarios always sum to one and stay within `[0, 1]`
//! - Matrix scenarios differ from the input only at targeted cells
//! - Generators return identical output for identical inputs and seeds

use ndarray::{Array1, Array2};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::alternative::{self, CandidateValues};
use crate::criteria;
use crate::model::{ColumnParam, Indexes};
use crate::probabilistic::{
    PerturbationScale, WeightDistribution, monte_carlo_weights, perturbed_matrix,
};

fn weights_strategy() -> impl Strategy<Value = Array1<f64>> {
    prop::collection::vec(0.05f64..1.0, 2..6).prop_map(|raw| {
        let total: f64 = raw.iter().sum();
        Array1::from_vec(raw) / total
    })
}

fn matrix_strategy() -> impl Strategy<Value = Array2<f64>> {
    (2usize..5, 2usize..5).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(0.0f64..10.0, rows * cols)
            .prop_map(move |values| Array2::from_shape_vec((rows, cols), values).unwrap())
    })
}

fn assert_normalized(weights: &Array1<f64>) -> Result<(), TestCaseError> {
    prop_assert!((weights.sum() - 1.0).abs() < 1e-3, "sum {}", weights.sum());
    prop_assert!(weights.iter().all(|w| (0.0..=1.0).contains(w)));
    Ok(())
}

proptest! {
    #[test]
    fn percentage_weights_stay_normalized(
        weights in weights_strategy(),
        percentage in 1.0f64..40.0,
    ) {
        let scenarios = criteria::percentage_modification(
            &weights,
            &ColumnParam::Uniform(percentage),
            None,
            &Indexes::All,
            &ColumnParam::Uniform(1.0),
        )
        .unwrap();
        for scenario in &scenarios {
            assert_normalized(&scenario.weights)?;
        }
    }

    #[test]
    fn range_weights_stay_normalized(weights in weights_strategy()) {
        let bounds = vec![(0.0, 1.0); weights.len()];
        let scenarios = criteria::range_modification(
            &weights,
            &bounds,
            &Indexes::All,
            &ColumnParam::Uniform(0.05),
        )
        .unwrap();
        for scenario in &scenarios {
            assert_normalized(&scenario.weights)?;
        }
    }

    #[test]
    fn removal_weights_stay_normalized(
        matrix in matrix_strategy().prop_filter("needs three criteria", |m| m.ncols() >= 3),
    ) {
        let weights = Array1::from_elem(matrix.ncols(), 1.0 / matrix.ncols() as f64);
        for removal in criteria::remove_criteria(&matrix, &weights, &Indexes::All).unwrap() {
            prop_assert_eq!(removal.weights.len(), matrix.ncols() - 1);
            assert_normalized(&removal.weights)?;
        }
    }

    #[test]
    fn discrete_changes_only_targeted_cells(matrix in matrix_strategy()) {
        let values = CandidateValues::PerColumn(vec![vec![11.0, 12.5]; matrix.ncols()]);
        let scenarios =
            alternative::discrete_modification(&matrix, &values, &Indexes::All).unwrap();
        prop_assert_eq!(scenarios.len(), 2 * matrix.len());

        for scenario in &scenarios {
            let targeted = scenario.criteria.indices();
            for ((i, j), value) in scenario.matrix.indexed_iter() {
                if i == scenario.alternative && targeted.contains(&j) {
                    prop_assert!(*value == 11.0 || *value == 12.5);
                } else {
                    prop_assert_eq!(*value, matrix[[i, j]]);
                }
            }
        }
    }

    #[test]
    fn seeded_generators_repeat(matrix in matrix_strategy(), seed in any::<u64>()) {
        let scale = PerturbationScale::Uniform(0.5);
        let first = perturbed_matrix(&matrix, 3, 6, &scale, &mut SmallRng::seed_from_u64(seed));
        let second = perturbed_matrix(&matrix, 3, 6, &scale, &mut SmallRng::seed_from_u64(seed));
        prop_assert_eq!(first.unwrap(), second.unwrap());

        let dist = WeightDistribution::default();
        let first = monte_carlo_weights(3, &dist, 5, &mut SmallRng::seed_from_u64(seed));
        let second = monte_carlo_weights(3, &dist, 5, &mut SmallRng::seed_from_u64(seed));
        prop_assert_eq!(first.unwrap(), second.unwrap());
    }
}

#[test]
fn test_weights_grid_repeats() {
    let mut first = criteria::weights_grid(4, 0.2, 3).unwrap();
    let mut second = criteria::weights_grid(4, 0.2, 3).unwrap();
    first.sort_by(|a, b| a.partial_cmp(b).unwrap());
    second.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(first, second);
}
