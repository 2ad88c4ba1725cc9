use ndarray::{Array1, Array2, Axis};

use crate::error::{Result, SensitivityError};
use crate::evaluation::{RankOrder, rank_data};

use super::check_rankings;

/// Rank position method: alternatives ordered by `1 / Σ(1 / rank)`.
pub fn rank_position(rankings: &Array2<f64>) -> Result<Array1<f64>> {
    check_rankings(rankings)?;
    if rankings.iter().any(|r| *r <= 0.0) {
        return Err(SensitivityError::invalid("rankings", "positions should be positive"));
    }
    let preference = rankings
        .mapv(f64::recip)
        .sum_axis(Axis(1))
        .mapv(f64::recip);
    Ok(rank_data(&preference, RankOrder::Ascending))
}
