use ndarray::{Array1, Array2, Axis};

use crate::error::Result;
use crate::evaluation::{RankOrder, rank_data};

use super::check_rankings;

/// Borda count: each ranking awards `N + 1 - rank` points.
pub fn borda(rankings: &Array2<f64>) -> Result<Array1<f64>> {
    check_rankings(rankings)?;
    let n = rankings.nrows() as f64;
    let scores = rankings.mapv(|r| n + 1.0 - r).sum_axis(Axis(1));
    Ok(rank_data(&scores, RankOrder::Descending))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_borda() {
        let rankings = array![[3.0, 2.0, 3.0], [4.0, 4.0, 4.0], [2.0, 3.0, 2.0], [1.0, 1.0, 1.0]];
        assert_eq!(borda(&rankings).unwrap(), array![3.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn test_borda_tie() {
        let rankings = array![[1.0, 2.0], [2.0, 1.0]];
        assert_eq!(borda(&rankings).unwrap(), array![1.5, 1.5]);
    }
}
