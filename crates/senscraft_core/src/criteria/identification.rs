use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use crate::alternative::drop_indices;
use crate::error::{Result, SensitivityError};
use crate::evaluation::{
    CallArgs, Correlation, EvaluationMethod, RankOrder, Ranker, evaluate_with, weighted_spearman,
};
use crate::model::round_to;
use crate::validator;

/// Outcome of one greedy exclusion round
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceRecord {
    /// Original indices of every criterion excluded so far, this round's last
    pub excluded: Vec<usize>,
    /// One value per correlation coefficient, reference vs reduced ranking
    pub correlations: Vec<f64>,
    /// Sum of absolute preference differences against the round reference
    pub distance: f64,
    pub matrix: Array2<f64>,
}

fn equal_weights(n: usize) -> Array1<f64> {
    Array1::from_elem(n, 1.0 / n as f64)
}

/// Greedily identify the criteria whose removal changes the outcome least.
///
/// Each round evaluates the matrix without previously excluded criteria as
/// reference, then drops every remaining criterion in turn and keeps the
/// exclusion with the smallest preference distance. Weights are always equal.
/// `base.types` must be set. With no coefficients, weighted Spearman is used.
pub fn relevance_identification<M, R>(
    method: &M,
    base: &CallArgs,
    ranker: &R,
    order: RankOrder,
    excluded_criteria: usize,
    correlations: &[&dyn Correlation],
    precision: u32,
) -> Result<Vec<RelevanceRecord>>
where
    M: EvaluationMethod + ?Sized,
    R: Ranker + ?Sized,
{
    let initial = &base.matrix;
    validator::check_not_empty("matrix", initial)?;
    let types = base
        .types
        .as_ref()
        .ok_or_else(|| SensitivityError::MissingBinding("types".into()))?;
    validator::check_len("types", types.len(), initial.ncols())?;
    if excluded_criteria == 0 || excluded_criteria >= initial.ncols() {
        return Err(SensitivityError::invalid(
            "excluded_criteria",
            format!(
                "should be between 1 and {} for {} criteria",
                initial.ncols().saturating_sub(1),
                initial.ncols()
            ),
        ));
    }

    let default_coef: [&dyn Correlation; 1] = [&weighted_spearman];
    let coefs = if correlations.is_empty() {
        &default_coef[..]
    } else {
        correlations
    };

    let reduced_args = |excluded: &[usize]| -> CallArgs {
        let matrix = drop_indices(initial, Axis(1), excluded);
        let kept: Vec<usize> = (0..types.len()).filter(|c| !excluded.contains(c)).collect();
        CallArgs {
            weights: Some(equal_weights(matrix.ncols())),
            types: Some(types.select(Axis(0), &kept)),
            matrix,
        }
    };

    let mut excluded: Vec<usize> = Vec::new();
    let mut results = Vec::with_capacity(excluded_criteria);

    for round in 0..excluded_criteria {
        let reference_args = reduced_args(&excluded);
        let reference = evaluate_with(method, &reference_args)?;
        let reference_ranking = ranker.rank(&reference, order);

        let mut best: Option<RelevanceRecord> = None;
        for candidate in (0..initial.ncols()).filter(|c| !excluded.contains(c)) {
            let mut trial = excluded.clone();
            trial.push(candidate);
            let args = reduced_args(&trial);
            let preferences = evaluate_with(method, &args)?;
            let ranking = ranker.rank(&preferences, order);

            let distance = round_to(
                (&reference - &preferences).mapv(f64::abs).sum(),
                precision,
            );
            if best.as_ref().is_none_or(|b| distance < b.distance) {
                best = Some(RelevanceRecord {
                    excluded: trial,
                    correlations: coefs
                        .iter()
                        .map(|coef| {
                            round_to(coef.correlate(&reference_ranking, &ranking), precision)
                        })
                        .collect(),
                    distance,
                    matrix: args.matrix,
                });
            }
        }

        let Some(record) = best else {
            return Err(SensitivityError::calculation(round, "no criterion left to exclude"));
        };
        debug!(excluded = ?record.excluded, distance = record.distance, "criterion excluded");
        excluded = record.excluded.clone();
        results.push(record);
    }
    Ok(results)
}
