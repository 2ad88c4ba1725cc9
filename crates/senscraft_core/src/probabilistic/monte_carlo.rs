use ndarray::{Array1, Array2};
use rand::Rng;
use tracing::debug;

use crate::error::{Result, SensitivityError};
use crate::model::{ScenarioSet, sample_label};

use super::WeightDistribution;

/// Draw `num_samples` weight vectors of `n` criteria from `distribution`.
///
/// Returns a `num_samples x n` matrix; every row sums to one.
pub fn monte_carlo_weights<R: Rng + ?Sized>(
    n: usize,
    distribution: &WeightDistribution,
    num_samples: usize,
    rng: &mut R,
) -> Result<Array2<f64>> {
    if n == 0 {
        return Err(SensitivityError::invalid("n", "at least one criterion is required"));
    }
    if num_samples == 0 {
        return Err(SensitivityError::invalid(
            "num_samples",
            "should be a positive integer",
        ));
    }
    distribution.validate()?;

    let mut samples = Array2::zeros((num_samples, n));
    for mut row in samples.rows_mut() {
        row.assign(&distribution.sample_weights(n, rng)?);
    }
    debug!(
        distribution = distribution.name(),
        num_samples, "monte carlo weights generated"
    );
    Ok(samples)
}

/// Draw `n` coarse weight vectors from integers in `0..100`, keyed `S[k]`.
pub fn random_weights<R: Rng + ?Sized>(
    criteria: usize,
    n: usize,
    rng: &mut R,
) -> Result<ScenarioSet<Array1<f64>>> {
    if criteria == 0 {
        return Err(SensitivityError::invalid(
            "criteria",
            "at least one criterion is required",
        ));
    }

    let mut scenarios = ScenarioSet::new();
    for step in 0..n {
        // Redraw the all-zero vector, it cannot be normalized
        let raw = loop {
            let draw: Array1<f64> = (0..criteria)
                .map(|_| f64::from(rng.random_range(0u32..100)))
                .collect();
            if draw.sum() > 0.0 {
                break draw;
            }
        };
        let total = raw.sum();
        scenarios.insert(sample_label(step), raw / total);
    }
    Ok(scenarios)
}
