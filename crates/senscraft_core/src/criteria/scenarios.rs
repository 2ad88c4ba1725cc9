//! Exhaustive weight-space grids.
//!
//! Enumerates every weight vector on a regular grid whose components sum to
//! one. The search tree is split by its top-level branch up front so the
//! branches can be expanded independently.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, SensitivityError};
use crate::model::round_to;
use crate::validator;

/// Default decimal places for grid weights
pub const DEFAULT_GRID_PRECISION: u32 = 3;

/// Pending subtree: criteria left to fill, grid points left, filled suffix
struct Branch {
    remaining: usize,
    points: usize,
    suffix: Vec<usize>,
}

fn expand_branch(root: Branch, step: f64, precision: u32) -> Vec<Vec<f64>> {
    let to_weight = |units: usize| round_to(units as f64 * step, precision);
    let mut out = Vec::new();
    let mut stack = vec![root];

    while let Some(Branch {
        remaining,
        points,
        suffix,
    }) = stack.pop()
    {
        if remaining == 2 {
            for i in 0..=points {
                let mut weights = Vec::with_capacity(suffix.len() + 2);
                weights.push(to_weight(i));
                weights.push(to_weight(points - i));
                weights.extend(suffix.iter().map(|&u| to_weight(u)));
                out.push(weights);
            }
        } else {
            for i in 0..=points {
                let mut next = Vec::with_capacity(suffix.len() + 1);
                next.push(points - i);
                next.extend_from_slice(&suffix);
                stack.push(Branch {
                    remaining: remaining - 1,
                    points: i,
                    suffix: next,
                });
            }
        }
    }
    out
}

/// Every weight vector of `n` criteria on a `step` grid summing to one.
///
/// Order of the returned vectors is not part of the contract.
pub fn weights_grid(n: usize, step: f64, precision: u32) -> Result<Vec<Vec<f64>>> {
    if n == 0 {
        return Err(SensitivityError::invalid("n", "at least one criterion is required"));
    }
    validator::check_positive("step", step, 0.0)?;
    validator::check_in_range("step", step, 0.0, 1.0)?;

    let max_points = (1.0 / step + 1e-9).floor() as usize;
    if n == 1 {
        return Ok(vec![vec![round_to(max_points as f64 * step, precision)]]);
    }
    if n == 2 {
        return Ok(expand_branch(
            Branch {
                remaining: 2,
                points: max_points,
                suffix: Vec::new(),
            },
            step,
            precision,
        ));
    }

    let branches: Vec<Branch> = (0..=max_points)
        .map(|i| Branch {
            remaining: n - 1,
            points: i,
            suffix: vec![max_points - i],
        })
        .collect();

    #[cfg(feature = "parallel")]
    let scenarios: Vec<Vec<f64>> = branches
        .into_par_iter()
        .flat_map_iter(|branch| expand_branch(branch, step, precision))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let scenarios: Vec<Vec<f64>> = branches
        .into_iter()
        .flat_map(|branch| expand_branch(branch, step, precision))
        .collect();

    debug!(n, step, scenarios = scenarios.len(), "weights grid generated");
    Ok(scenarios)
}

/// Render one weight vector as `(w1, w2, ...)` for text dumps.
#[must_use]
pub fn format_scenario_line(weights: &[f64]) -> String {
    let parts: Vec<String> = weights.iter().map(|w| format!("{w:?}")).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_criteria_tenth_step() {
        let grid = weights_grid(4, 0.1, 3).unwrap();
        // compositions of 10 units into 4 parts: C(13, 3)
        assert_eq!(grid.len(), 286);
        for weights in &grid {
            assert_eq!(weights.len(), 4);
            assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_grid_has_no_duplicates() {
        let mut grid = weights_grid(3, 0.25, 3).unwrap();
        assert_eq!(grid.len(), 15);
        grid.sort_by(|a, b| a.partial_cmp(b).unwrap());
        grid.dedup();
        assert_eq!(grid.len(), 15);
    }

    #[test]
    fn test_two_and_one_criteria() {
        let pairs = weights_grid(2, 0.5, 3).unwrap();
        assert_eq!(pairs, vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]]);
        assert_eq!(weights_grid(1, 0.1, 3).unwrap(), vec![vec![1.0]]);
    }

    #[test]
    fn test_invalid_step() {
        assert!(weights_grid(3, 0.0, 3).is_err());
        assert!(weights_grid(3, 1.5, 3).is_err());
        assert!(weights_grid(0, 0.1, 3).is_err());
    }

    #[test]
    fn test_line_format() {
        assert_eq!(format_scenario_line(&[0.1, 0.9, 0.0]), "(0.1, 0.9, 0.0)");
    }
}
