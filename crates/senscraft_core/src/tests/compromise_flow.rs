//! Tests for aggregating scenario rankings into compromises
//!
//! These tests verify that:
//! - Rankings from perturbed weights can be aggregated by every rule
//! - Aggregation rules agree when all rankings are identical
//! - Fuzzy summaries count every sampled ranking

use ndarray::{Array1, Array2, Axis, array};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::compromise::{
    HqOptions, borda, dominance_directed_graph, hq_compromise, rank_position,
};
use crate::evaluation::{CallArgs, MethodError, RankOrder, calculate_preference, rank_data};
use crate::probabilistic::{PerturbationScale, perturbed_weights};
use crate::ranking::{FuzzyNormalization, fuzzy_ranking};

fn matrix() -> Array2<f64> {
    array![
        [0.6, 0.3, 0.8],
        [0.2, 0.9, 0.4],
        [0.7, 0.5, 0.1],
        [0.3, 0.4, 0.9]
    ]
}

fn weighted(args: &CallArgs) -> Result<Array1<f64>, MethodError> {
    let weights = args.weights.as_ref().ok_or("weights missing")?;
    Ok(args.matrix.dot(weights))
}

/// Rankings under perturbed weights, one column per sample
fn sampled_rankings(samples: usize) -> Array2<f64> {
    let mut rng = SmallRng::seed_from_u64(17);
    let sampled = perturbed_weights(
        &array![0.4, 0.3, 0.3],
        samples,
        6,
        &PerturbationScale::Uniform(0.1),
        &mut rng,
    )
    .unwrap();
    let rows: Vec<Array1<f64>> = sampled.axis_iter(Axis(0)).map(|r| r.to_owned()).collect();

    let preferences = calculate_preference(&rows, &weighted, &CallArgs::new(matrix())).unwrap();
    let mut rankings = Array2::zeros((matrix().nrows(), samples));
    for (mut column, prefs) in rankings.axis_iter_mut(Axis(1)).zip(&preferences) {
        column.assign(&rank_data(prefs, RankOrder::Descending));
    }
    rankings
}

#[test]
fn test_every_rule_ranks_all_alternatives() {
    let rankings = sampled_rankings(25);
    for compromise in [
        borda(&rankings).unwrap(),
        dominance_directed_graph(&rankings).unwrap(),
        rank_position(&rankings).unwrap(),
    ] {
        assert_eq!(compromise.len(), 4);
        // average ranks always sum to N(N+1)/2
        assert!((compromise.sum() - 10.0).abs() < 1e-9);
    }

    let hq = hq_compromise(&rankings, &HqOptions::default()).unwrap();
    assert!((hq.weights.sum() - 1.0).abs() < 1e-9);
    assert!((0.0..=1.0).contains(&hq.consensus));
    assert!((0.0..=1.0).contains(&hq.trust));
}

#[test]
fn test_identical_rankings_agree() {
    let ranking = array![2.0, 4.0, 1.0, 3.0];
    let rankings = Array2::from_shape_fn((4, 3), |(i, _)| ranking[i]);
    assert_eq!(borda(&rankings).unwrap(), ranking);
    assert_eq!(dominance_directed_graph(&rankings).unwrap(), ranking);
    assert_eq!(rank_position(&rankings).unwrap(), ranking);
    assert_eq!(
        hq_compromise(&rankings, &HqOptions::default()).unwrap().ranking,
        ranking
    );
}

#[test]
fn test_fuzzy_summary_of_samples() {
    let samples = 40;
    // fuzzy ranking takes one ranking per row
    let rankings = sampled_rankings(samples).reversed_axes();
    let shares = fuzzy_ranking(&rankings, FuzzyNormalization::None).unwrap();
    assert_eq!(shares.dim(), (4, 4));
    let counted: f64 = shares.sum() * samples as f64;
    let tie_free = rankings
        .rows()
        .into_iter()
        .filter(|r| r.iter().all(|p| p.fract() == 0.0))
        .count();
    assert!((counted - (4 * tie_free) as f64).abs() < 0.05);
}
