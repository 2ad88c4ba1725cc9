use ndarray::{Array1, Array2, Axis};

use crate::error::Result;
use crate::evaluation::{RankOrder, rank_data};

use super::check_rankings;

/// Dominance directed graph compromise.
///
/// For each ranking `A[i, j] = 1` when `j` ranks worse than `i`. Two-step
/// dominance `A + A·A` is accumulated over all rankings and alternatives are
/// ranked by their total dominance.
pub fn dominance_directed_graph(rankings: &Array2<f64>) -> Result<Array1<f64>> {
    check_rankings(rankings)?;
    let n = rankings.nrows();
    let mut points = Array2::<f64>::zeros((n, n));

    for ranking in rankings.axis_iter(Axis(1)) {
        let dominance =
            Array2::from_shape_fn((n, n), |(i, j)| f64::from(u8::from(ranking[j] > ranking[i])));
        points = points + &dominance + dominance.dot(&dominance);
    }
    Ok(rank_data(&points.sum_axis(Axis(1)), RankOrder::Descending))
}
