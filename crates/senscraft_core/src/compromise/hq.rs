use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

use super::check_rankings;

pub const DEFAULT_HQ_MAX_ITERS: usize = 1000;
pub const DEFAULT_HQ_TOLERANCE: f64 = 1e-9;

fn default_max_iters() -> usize {
    DEFAULT_HQ_MAX_ITERS
}

fn default_tolerance() -> f64 {
    DEFAULT_HQ_TOLERANCE
}

/// Stopping rule for the half-quadratic iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HqOptions {
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for HqOptions {
    fn default() -> Self {
        Self {
            max_iters: DEFAULT_HQ_MAX_ITERS,
            tolerance: DEFAULT_HQ_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HqCompromise {
    /// Mean agreement of every ranking with the compromise, in `[0, 1]`
    pub consensus: f64,
    /// Weighted agreement, in `[0, 1]`
    pub trust: f64,
    /// One weight per input ranking, summing to one
    pub weights: Array1<f64>,
    /// Compromise positions; continuous, round for an ordinal ranking
    pub ranking: Array1<f64>,
    pub iterations: usize,
    pub converged: bool,
}

fn distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Gaussian kernel relative to its peak, `pdf(x) / pdf(0)`
fn kernel(x: f64, sigma: f64) -> f64 {
    (-(x * x) / (2.0 * sigma * sigma)).exp()
}

/// Half-quadratic compromise over rankings (alternatives x rankings).
///
/// Starts from the mean ranking and alternates between a robust scale
/// estimate, Welsch weights per ranking, and the weighted mean ranking.
pub fn hq_compromise(rankings: &Array2<f64>, options: &HqOptions) -> Result<HqCompromise> {
    check_rankings(rankings)?;
    let (alternatives, m) = rankings.dim();
    let m_f = m as f64;

    let mut compromise = rankings.sum_axis(Axis(1)) / m_f;
    let mut alpha = Array1::<f64>::zeros(m);
    let mut weights = Array1::from_elem(m, 1.0 / m_f);
    let mut sigma = 0.0;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iters {
        let distances: Array1<f64> = rankings
            .axis_iter(Axis(1))
            .map(|column| distance(column, compromise.view()))
            .collect();
        sigma = distances.mapv(|d| d * d).sum() / (2.0 * m_f * m_f);
        if sigma == 0.0 {
            // Every ranking already equals the compromise
            iterations += 1;
            converged = true;
            break;
        }

        let previous_alpha = std::mem::replace(&mut alpha, distances.mapv(|d| kernel(d, sigma)));
        weights = &alpha / alpha.sum();
        let previous = std::mem::replace(&mut compromise, rankings.dot(&weights));
        iterations += 1;

        if distance(previous.view(), compromise.view()) <= options.tolerance
            && distance(previous_alpha.view(), alpha.view()) <= options.tolerance
        {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            max_iters = options.max_iters,
            "HQ compromise not obtained within the iteration limit"
        );
    }

    let (mut consensus, mut trust) = (0.0, 0.0);
    for (column, w) in rankings.axis_iter(Axis(1)).zip(&weights) {
        let agreement: f64 = column
            .iter()
            .zip(&compromise)
            .map(|(r, c)| if sigma == 0.0 { 1.0 } else { kernel(r - c, sigma) })
            .sum();
        consensus += agreement;
        trust += w * agreement;
    }
    let k = alternatives as f64;
    debug!(iterations, converged, "HQ compromise finished");

    Ok(HqCompromise {
        consensus: consensus / (k * m_f),
        trust: trust / k,
        weights,
        ranking: compromise,
        iterations,
        converged,
    })
}
