//! Collaborator interfaces for injected MCDM methods.
//!
//! Evaluation methods, ranking functions, and correlation coefficients are
//! supplied by the caller. Closures implement each trait directly.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SensitivityError};
use crate::model::{AlternativeRemoval, CriteriaRemoval, MatrixScenario, WeightScenario};

/// Error type returned by injected methods
pub type MethodError = Box<dyn std::error::Error + Send + Sync>;

/// Arguments handed to an evaluation method
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgs {
    pub matrix: Array2<f64>,
    pub weights: Option<Array1<f64>>,
    /// Criteria types, `1.0` for profit and `-1.0` for cost
    pub types: Option<Array1<f64>>,
}

impl CallArgs {
    pub fn new(matrix: Array2<f64>) -> Self {
        Self {
            matrix,
            weights: None,
            types: None,
        }
    }

    pub fn weights(mut self, weights: Array1<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn types(mut self, types: Array1<f64>) -> Self {
        self.types = Some(types);
        self
    }

    pub(crate) fn with_matrix(&self, matrix: Array2<f64>) -> Self {
        Self {
            matrix,
            weights: self.weights.clone(),
            types: self.types.clone(),
        }
    }
}

/// An MCDM method producing one preference value per alternative.
pub trait EvaluationMethod {
    fn evaluate(&self, args: &CallArgs) -> std::result::Result<Array1<f64>, MethodError>;
}

impl<F> EvaluationMethod for F
where
    F: Fn(&CallArgs) -> std::result::Result<Array1<f64>, MethodError>,
{
    fn evaluate(&self, args: &CallArgs) -> std::result::Result<Array1<f64>, MethodError> {
        self(args)
    }
}

/// Run `method`, turning its failure into a [`SensitivityError::Evaluation`].
pub(crate) fn evaluate_with(
    method: &(impl EvaluationMethod + ?Sized),
    args: &CallArgs,
) -> Result<Array1<f64>> {
    let prefs = method
        .evaluate(args)
        .map_err(|e| SensitivityError::Evaluation(e.to_string()))?;
    if prefs.len() != args.matrix.nrows() {
        return Err(SensitivityError::Evaluation(format!(
            "expected {} preferences, got {}",
            args.matrix.nrows(),
            prefs.len()
        )));
    }
    Ok(prefs)
}

/// Ordering applied when converting preferences to ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Higher preference ranks first
    #[default]
    Descending,
    Ascending,
}

impl RankOrder {
    /// Numeric form used in binding tables: `1` descending, `-1` ascending
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            RankOrder::Descending => 1.0,
            RankOrder::Ascending => -1.0,
        }
    }
}

/// Converts preference values to positional ranks (1 = best).
pub trait Ranker {
    fn rank(&self, values: &Array1<f64>, order: RankOrder) -> Array1<f64>;
}

impl<F> Ranker for F
where
    F: Fn(&Array1<f64>, RankOrder) -> Array1<f64>,
{
    fn rank(&self, values: &Array1<f64>, order: RankOrder) -> Array1<f64> {
        self(values, order)
    }
}

/// Default ranker; tied values share the average of their positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageRanker;

impl Ranker for AverageRanker {
    fn rank(&self, values: &Array1<f64>, order: RankOrder) -> Array1<f64> {
        rank_data(values, order)
    }
}

/// Rank `values` with ties receiving the average rank.
#[must_use]
pub fn rank_data(values: &Array1<f64>, order: RankOrder) -> Array1<f64> {
    let n = values.len();
    let mut idx: Vec<usize> = (0..n).collect();
    idx.sort_by(|&a, &b| match order {
        RankOrder::Ascending => values[a].total_cmp(&values[b]),
        RankOrder::Descending => values[b].total_cmp(&values[a]),
    });

    let mut ranks = Array1::zeros(n);
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[idx[end]] == values[idx[start]] {
            end += 1;
        }
        // Positions start+1..=end share their mean
        let shared = (start + 1 + end) as f64 / 2.0;
        for &i in &idx[start..end] {
            ranks[i] = shared;
        }
        start = end;
    }
    ranks
}

/// Correlation between two rankings.
pub trait Correlation {
    fn correlate(&self, a: &Array1<f64>, b: &Array1<f64>) -> f64;
}

impl<F> Correlation for F
where
    F: Fn(&Array1<f64>, &Array1<f64>) -> f64,
{
    fn correlate(&self, a: &Array1<f64>, b: &Array1<f64>) -> f64 {
        self(a, b)
    }
}

/// Spearman rank correlation for tie-free rankings
#[must_use]
pub fn spearman(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    let n = a.len() as f64;
    let d2: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    1.0 - 6.0 * d2 / (n * (n * n - 1.0))
}

/// Weighted Spearman correlation, emphasising agreement at the top positions
#[must_use]
pub fn weighted_spearman(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    let n = a.len() as f64;
    let num: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2) * ((n - x + 1.0) + (n - y + 1.0)))
        .sum();
    1.0 - 6.0 * num / (n.powi(4) + n.powi(3) - n.powi(2) - n)
}

/// A scenario that can be turned into method arguments.
pub trait ScenarioInput {
    fn call_args(&self, base: &CallArgs) -> CallArgs;
}

impl ScenarioInput for MatrixScenario {
    fn call_args(&self, base: &CallArgs) -> CallArgs {
        base.with_matrix(self.matrix.clone())
    }
}

impl ScenarioInput for AlternativeRemoval {
    fn call_args(&self, base: &CallArgs) -> CallArgs {
        base.with_matrix(self.matrix.clone())
    }
}

impl ScenarioInput for WeightScenario {
    fn call_args(&self, base: &CallArgs) -> CallArgs {
        CallArgs {
            matrix: base.matrix.clone(),
            weights: Some(self.weights.clone()),
            types: base.types.clone(),
        }
    }
}

/// Removed criteria also drop out of the types vector.
impl ScenarioInput for CriteriaRemoval {
    fn call_args(&self, base: &CallArgs) -> CallArgs {
        let removed = self.removed.indices();
        let types = base.types.as_ref().map(|types| {
            let kept: Vec<usize> = (0..types.len()).filter(|i| !removed.contains(i)).collect();
            types.select(Axis(0), &kept)
        });
        CallArgs {
            matrix: self.matrix.clone(),
            weights: Some(self.weights.clone()),
            types,
        }
    }
}

/// A bare weight vector replaces the base weights.
impl ScenarioInput for Array1<f64> {
    fn call_args(&self, base: &CallArgs) -> CallArgs {
        CallArgs {
            matrix: base.matrix.clone(),
            weights: Some(self.clone()),
            types: base.types.clone(),
        }
    }
}

/// A bare matrix replaces the base matrix.
impl ScenarioInput for Array2<f64> {
    fn call_args(&self, base: &CallArgs) -> CallArgs {
        base.with_matrix(self.clone())
    }
}

/// Evaluate `method` on every scenario, one preference vector per scenario.
pub fn calculate_preference<'a, S, I, M>(
    scenarios: I,
    method: &M,
    base: &CallArgs,
) -> Result<Vec<Array1<f64>>>
where
    S: ScenarioInput + 'a,
    I: IntoIterator<Item = &'a S>,
    M: EvaluationMethod + ?Sized,
{
    scenarios
        .into_iter()
        .map(|scenario| evaluate_with(method, &scenario.call_args(base)))
        .collect()
}
