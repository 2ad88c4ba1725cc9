use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SensitivityError};
use crate::model::round_to;
use crate::validator;

/// Default noise half-width
pub const DEFAULT_PERTURBATION_SCALE: f64 = 0.1;

/// Default decimal places of perturbed outputs
pub const DEFAULT_PERTURBATION_PRECISION: u32 = 6;

/// Half-width of the uniform noise added to each value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerturbationScale {
    Uniform(f64),
    PerColumn(Vec<f64>),
    PerCell(Vec<Vec<f64>>),
}

impl Default for PerturbationScale {
    fn default() -> Self {
        PerturbationScale::Uniform(DEFAULT_PERTURBATION_SCALE)
    }
}

impl PerturbationScale {
    /// Resolve to one half-width per cell of a `rows x cols` grid
    fn grid(&self, rows: usize, cols: usize) -> Result<Array2<f64>> {
        let grid = match self {
            PerturbationScale::Uniform(scale) => Array2::from_elem((rows, cols), *scale),
            PerturbationScale::PerColumn(scales) => {
                validator::check_len("perturbation_scale", scales.len(), cols)?;
                Array2::from_shape_fn((rows, cols), |(_, j)| scales[j])
            }
            PerturbationScale::PerCell(scales) => {
                validator::check_len("perturbation_scale", scales.len(), rows)?;
                for row in scales {
                    validator::check_len("perturbation_scale", row.len(), cols)?;
                }
                Array2::from_shape_fn((rows, cols), |(i, j)| scales[i][j])
            }
        };
        validator::check_non_negative("perturbation_scale", grid.iter().copied())?;
        validator::check_finite("perturbation_scale", grid.iter().copied())?;
        Ok(grid)
    }
}

fn noise<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    if scale == 0.0 {
        0.0
    } else {
        rng.random_range(-scale..=scale)
    }
}

fn check_simulations(simulations: usize) -> Result<()> {
    if simulations == 0 {
        return Err(SensitivityError::invalid(
            "simulations",
            "should be a positive integer",
        ));
    }
    Ok(())
}

/// Add uniform noise in `[-scale, scale]` to every matrix cell.
///
/// Returns `simulations` perturbed copies rounded to `precision` decimals.
pub fn perturbed_matrix<R: Rng + ?Sized>(
    matrix: &Array2<f64>,
    simulations: usize,
    precision: u32,
    scale: &PerturbationScale,
    rng: &mut R,
) -> Result<Vec<Array2<f64>>> {
    validator::check_not_empty("matrix", matrix)?;
    check_simulations(simulations)?;
    let (rows, cols) = matrix.dim();
    let scales = scale.grid(rows, cols)?;

    let results: Vec<Array2<f64>> = (0..simulations)
        .map(|_| {
            Array2::from_shape_fn((rows, cols), |(i, j)| {
                round_to(matrix[[i, j]] + noise(rng, scales[[i, j]]), precision)
            })
        })
        .collect();
    debug!(simulations, "perturbed matrices generated");
    Ok(results)
}

/// Add uniform noise to weights, clip to `[0, 1]`, and renormalize.
///
/// Returns a `simulations x n` matrix, one weight vector per row. A draw that
/// clips every weight to zero falls back to equal weights.
pub fn perturbed_weights<R: Rng + ?Sized>(
    weights: &Array1<f64>,
    simulations: usize,
    precision: u32,
    scale: &PerturbationScale,
    rng: &mut R,
) -> Result<Array2<f64>> {
    validator::check_weights(weights)?;
    check_simulations(simulations)?;
    if matches!(scale, PerturbationScale::PerCell(_)) {
        return Err(SensitivityError::invalid(
            "perturbation_scale",
            "weights take a scalar or one scale per criterion",
        ));
    }
    let n = weights.len();
    let scales = scale.grid(1, n)?;

    let mut out = Array2::zeros((simulations, n));
    for mut row in out.rows_mut() {
        let candidate: Array1<f64> = weights
            .iter()
            .enumerate()
            .map(|(j, w)| (w + noise(rng, scales[[0, j]])).clamp(0.0, 1.0))
            .collect();
        let total = candidate.sum();
        let normalized = if total > 0.0 {
            candidate / total
        } else {
            Array1::from_elem(n, 1.0 / n as f64)
        };
        row.assign(&normalized.mapv(|w| round_to(w, precision)));
    }
    debug!(simulations, "perturbed weights generated");
    Ok(out)
}
