use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::round_to;
use crate::validator;

const FUZZY_PRECISION: u32 = 4;

/// Rescaling applied to the positional frequency matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyNormalization {
    #[default]
    None,
    /// Each position row divided by its maximum
    ByPosition,
    /// Each alternative column divided by its maximum
    ByAlternative,
}

/// Share of rankings placing each alternative at each position.
///
/// `rankings` holds one ranking per row (alternatives in columns). The result
/// is `position x alternative`. Tied, fractional positions are not counted.
pub fn fuzzy_ranking(
    rankings: &Array2<f64>,
    normalization: FuzzyNormalization,
) -> Result<Array2<f64>> {
    validator::check_not_empty("rankings", rankings)?;
    let (samples, alternatives) = rankings.dim();

    let mut shares = Array2::<f64>::zeros((alternatives, alternatives));
    for ranking in rankings.rows() {
        for (alt, position) in ranking.iter().enumerate() {
            if position.fract() == 0.0 && *position >= 1.0 && *position <= alternatives as f64 {
                shares[[*position as usize - 1, alt]] += 1.0;
            }
        }
    }
    shares.mapv_inplace(|count| round_to(count / samples as f64, FUZZY_PRECISION));

    let axis = match normalization {
        FuzzyNormalization::None => return Ok(shares),
        FuzzyNormalization::ByPosition => Axis(0),
        FuzzyNormalization::ByAlternative => Axis(1),
    };
    for mut lane in shares.axis_iter_mut(axis) {
        let max = lane.fold(0.0_f64, |a, b| a.max(*b));
        if max > 0.0 {
            lane.mapv_inplace(|v| round_to(v / max, FUZZY_PRECISION));
        }
    }
    Ok(shares)
}
