use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::error::{Result, SensitivityError};
use crate::evaluation::{RankOrder, rank_data};
use crate::validator;

/// Utility transform applied to one method's preference column
pub type UtilityFn = Box<dyn Fn(ArrayView1<f64>) -> Array1<f64> + Send + Sync>;

/// Column normalization; the flag marks cost-type columns
pub type NormalizationFn = fn(ArrayView1<f64>, bool) -> Array1<f64>;

/// Vector normalization: `x / ‖x‖` for profit, `1 - x / ‖x‖` for cost.
#[must_use]
pub fn vector_normalization(x: ArrayView1<f64>, cost: bool) -> Array1<f64> {
    let norm = x.dot(&x).sqrt();
    let scaled = x.mapv(|v| v / norm);
    if cost { scaled.mapv(|v| 1.0 - v) } else { scaled }
}

pub struct ImprovedBordaOptions {
    /// Per method: `1` when higher preference is better, `-1` otherwise.
    /// Empty means every method is `1`.
    pub preference_types: Vec<i8>,
    /// Per method: `-1` normalizes as cost, `1` as profit. Empty means profit.
    pub norm_types: Vec<i8>,
    /// Empty, or one transform per method
    pub utilities: Vec<UtilityFn>,
    pub normalization: NormalizationFn,
}

impl Default for ImprovedBordaOptions {
    fn default() -> Self {
        Self {
            preference_types: Vec::new(),
            norm_types: Vec::new(),
            utilities: Vec::new(),
            normalization: vector_normalization,
        }
    }
}

fn types_or_ones(name: &'static str, types: &[i8], methods: usize) -> Result<Vec<i8>> {
    if types.is_empty() {
        return Ok(vec![1; methods]);
    }
    validator::check_len(name, types.len(), methods)?;
    validator::check_directions(name, types)?;
    Ok(types.to_vec())
}

/// Improved Borda score over preference columns (alternatives x methods).
///
/// Each method contributes its normalized utility weighted by its Borda
/// position share. Methods ranking ascending subtract their contribution.
pub fn improved_borda(
    preferences: &Array2<f64>,
    options: &ImprovedBordaOptions,
) -> Result<Array1<f64>> {
    validator::check_not_empty("preferences", preferences)?;
    let (alternatives, methods) = preferences.dim();
    let preference_types = types_or_ones("preference_types", &options.preference_types, methods)?;
    let norm_types = types_or_ones("norm_types", &options.norm_types, methods)?;
    if !options.utilities.is_empty() {
        validator::check_len("utilities", options.utilities.len(), methods)?;
    }

    let n = alternatives as f64;
    let total = n * (n + 1.0) / 2.0;
    let mut scores = Array1::<f64>::zeros(alternatives);

    for (m, column) in preferences.axis_iter(Axis(1)).enumerate() {
        let utility = match options.utilities.get(m) {
            Some(f) => f(column),
            None => column.to_owned(),
        };
        if utility.len() != alternatives {
            return Err(SensitivityError::shape(
                "utilities",
                alternatives.to_string(),
                utility.len().to_string(),
            ));
        }
        let normalized = (options.normalization)(utility.view(), norm_types[m] == -1);

        let order = if preference_types[m] == 1 {
            RankOrder::Descending
        } else {
            RankOrder::Ascending
        };
        let ranks = rank_data(&column.to_owned(), order);

        if preference_types[m] == -1 {
            scores = scores - &normalized * &ranks.mapv(|r| r / total);
        } else {
            scores = scores + &normalized * &ranks.mapv(|r| (n - r + 1.0) / total);
        }
    }
    Ok(rank_data(&scores, RankOrder::Descending))
}
