use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SensitivityError};
use crate::evaluation::{CallArgs, EvaluationMethod, RankOrder, Ranker, evaluate_with};
use crate::validator;

/// Which way the searched alternative should move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchGoal {
    /// Towards position 1
    Promotion,
    /// Towards the last position
    Demotion,
}

impl SearchGoal {
    fn improves(self, rank: f64, best: f64) -> bool {
        match self {
            SearchGoal::Promotion => rank < best,
            SearchGoal::Demotion => rank > best,
        }
    }

    fn extreme(self, alternatives: usize) -> f64 {
        match self {
            SearchGoal::Promotion => 1.0,
            SearchGoal::Demotion => alternatives as f64,
        }
    }
}

/// Outcome for one (alternative, criterion) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub alternative: usize,
    pub criterion: usize,
    /// Cell value achieving `position`, `0.0` when nothing moved
    pub value: f64,
    pub position: f64,
}

fn default_return_zeros() -> bool {
    true
}

/// Stepwise search for the cell change that moves an alternative's rank.
///
/// Every cell is swept on its own from its current value in the column's
/// direction until a bound, or `max_modification` percent of the value, is
/// reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSearch {
    pub goal: SearchGoal,
    /// `1` increases, `-1` decreases, one per criterion
    pub direction: Vec<i8>,
    pub step: f64,
    /// Exclusive end value per criterion
    #[serde(default)]
    pub bounds: Option<Vec<f64>>,
    /// Sweep length in percent of the starting value, used without bounds
    #[serde(default)]
    pub max_modification: Option<f64>,
    /// Target position per alternative, `1..=N`
    #[serde(default)]
    pub positions: Option<Vec<usize>>,
    #[serde(default = "default_return_zeros")]
    pub return_zeros: bool,
}

impl RankingSearch {
    pub fn new(goal: SearchGoal, direction: Vec<i8>, step: f64) -> Self {
        Self {
            goal,
            direction,
            step,
            bounds: None,
            max_modification: None,
            positions: None,
            return_zeros: true,
        }
    }

    pub fn bounds(mut self, bounds: Vec<f64>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn max_modification(mut self, percent: f64) -> Self {
        self.max_modification = Some(percent);
        self
    }

    pub fn positions(mut self, positions: Vec<usize>) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn return_zeros(mut self, return_zeros: bool) -> Self {
        self.return_zeros = return_zeros;
        self
    }

    fn validate(&self, matrix: &Array2<f64>, initial_ranking: &Array1<f64>) -> Result<()> {
        validator::check_not_empty("matrix", matrix)?;
        let (alternatives, criteria) = matrix.dim();
        validator::check_len("initial_ranking", initial_ranking.len(), alternatives)?;
        validator::check_len("direction", self.direction.len(), criteria)?;
        validator::check_directions("direction", &self.direction)?;
        validator::check_positive("step", self.step, 0.0)?;
        validator::check_finite("step", [self.step])?;

        match (&self.bounds, self.max_modification) {
            (Some(bounds), _) => {
                validator::check_len("bounds", bounds.len(), criteria)?;
                validator::check_finite("bounds", bounds.iter().copied())?;
            }
            (None, Some(percent)) => {
                validator::check_positive("max_modification", percent, 0.0)?;
                validator::check_finite("max_modification", [percent])?;
            }
            (None, None) => {
                return Err(SensitivityError::invalid(
                    "max_modification",
                    "required when bounds are not given",
                ));
            }
        }

        if let Some(positions) = &self.positions {
            validator::check_len("positions", positions.len(), alternatives)?;
            if let Some(bad) = positions.iter().find(|p| **p == 0 || **p > alternatives) {
                return Err(SensitivityError::invalid(
                    "positions",
                    format!("position {bad} outside 1..={alternatives}"),
                ));
            }
        }
        Ok(())
    }

    /// Values swept for one cell, starting with the current value.
    fn candidates(&self, value: f64, criterion: usize) -> impl Iterator<Item = f64> {
        let d = f64::from(self.direction[criterion]);
        let limit = match (&self.bounds, self.max_modification) {
            (Some(bounds), _) => bounds[criterion],
            (None, percent) => value + d * value * percent.unwrap_or_default() / 100.0,
        };
        let delta = self.step * d;
        (0u64..)
            .map(move |k| value + k as f64 * delta)
            .take_while(move |v| if d > 0.0 { *v < limit } else { *v > limit })
    }

    /// Sweep every cell of `matrix`.
    ///
    /// `base` supplies the non-matrix arguments for `method`. Ranks come from
    /// `ranker` with `order`.
    pub fn run<M, R>(
        &self,
        matrix: &Array2<f64>,
        initial_ranking: &Array1<f64>,
        method: &M,
        base: &CallArgs,
        ranker: &R,
        order: RankOrder,
    ) -> Result<Vec<SearchRecord>>
    where
        M: EvaluationMethod + ?Sized,
        R: Ranker + ?Sized,
    {
        self.validate(matrix, initial_ranking)?;
        let (alternatives, criteria) = matrix.dim();
        let mut results = Vec::new();

        for alt in 0..alternatives {
            let initial = initial_ranking[alt];
            let target = self.positions.as_ref().map(|p| p[alt] as f64);

            for crit in 0..criteria {
                let mut best = target.unwrap_or(initial);
                let mut value = 0.0;

                for candidate in self.candidates(matrix[[alt, crit]], crit) {
                    let mut modified = matrix.clone();
                    modified[[alt, crit]] = candidate;
                    let preferences = evaluate_with(method, &base.with_matrix(modified))?;
                    let rank = ranker.rank(&preferences, order)[alt];

                    if self.goal.improves(rank, best) {
                        best = rank;
                        value = candidate;
                    }
                    match target {
                        None if rank == self.goal.extreme(alternatives) => break,
                        Some(t) if rank == t => {
                            // Only a move onto the target counts, not starting there
                            if initial != t {
                                best = rank;
                                value = candidate;
                            }
                            break;
                        }
                        _ => {}
                    }
                }

                if self.return_zeros || best != initial {
                    results.push(SearchRecord {
                        alternative: alt,
                        criterion: crit,
                        value,
                        position: best,
                    });
                }
            }
        }
        debug!(goal = ?self.goal, records = results.len(), "ranking search finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{AverageRanker, MethodError};
    use ndarray::{Axis, array};

    fn row_sum(args: &CallArgs) -> std::result::Result<Array1<f64>, MethodError> {
        Ok(args.matrix.sum_axis(Axis(1)))
    }

    fn matrix() -> Array2<f64> {
        array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]
    }

    fn run(search: &RankingSearch) -> Result<Vec<SearchRecord>> {
        let m = matrix();
        search.run(
            &m,
            &array![3.0, 2.0, 1.0],
            &row_sum,
            &CallArgs::new(m.clone()),
            &AverageRanker,
            RankOrder::Descending,
        )
    }

    fn record(alternative: usize, criterion: usize, value: f64, position: f64) -> SearchRecord {
        SearchRecord {
            alternative,
            criterion,
            value,
            position,
        }
    }

    #[test]
    fn test_promotion_to_first() {
        let search =
            RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 1.0).max_modification(1000.0);
        let results = run(&search).unwrap();
        assert_eq!(results.len(), 6);
        assert_eq!(results[0], record(0, 0, 6.0, 1.0));
        assert_eq!(results[2], record(1, 0, 5.0, 1.0));
        // already first
        assert_eq!(results[4], record(2, 0, 0.0, 1.0));
    }

    #[test]
    fn test_promotion_without_zeros() {
        let search = RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 1.0)
            .max_modification(1000.0)
            .return_zeros(false);
        let results = run(&search).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.alternative != 2));
    }

    #[test]
    fn test_limit_stops_short_of_first() {
        // 100% of 1.0 allows values 1.0 up to (not including) 2.0
        let search =
            RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 0.5).max_modification(100.0);
        let results = run(&search).unwrap();
        assert_eq!(results[0], record(0, 0, 0.0, 3.0));
    }

    #[test]
    fn test_demotion_limit_is_exclusive() {
        // 100% of each value sweeps down to, but not onto, zero
        let search =
            RankingSearch::new(SearchGoal::Demotion, vec![-1, -1], 1.0).max_modification(100.0);
        let results = run(&search).unwrap();
        assert_eq!(results[0], record(0, 0, 0.0, 3.0));
        assert_eq!(results[2], record(1, 0, 0.0, 2.0));
        // reaching 0.0 would drop it to second
        assert_eq!(results[4], record(2, 0, 1.0, 1.5));
    }

    #[test]
    fn test_zero_cell_has_empty_sweep() {
        let m = array![[0.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let search =
            RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 1.0).max_modification(50.0);
        let results = search
            .run(
                &m,
                &array![3.0, 2.0, 1.0],
                &row_sum,
                &CallArgs::new(m.clone()),
                &AverageRanker,
                RankOrder::Descending,
            )
            .unwrap();
        assert_eq!(results[0], record(0, 0, 0.0, 3.0));
        assert_eq!(results[1], record(0, 1, 0.0, 3.0));

        let moved_only = search.return_zeros(false);
        let results = moved_only
            .run(
                &m,
                &array![3.0, 2.0, 1.0],
                &row_sum,
                &CallArgs::new(m.clone()),
                &AverageRanker,
                RankOrder::Descending,
            )
            .unwrap();
        assert!(results.iter().all(|r| r.alternative != 0));
    }

    #[test]
    fn test_promotion_to_target_position() {
        let search = RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 1.0)
            .max_modification(1000.0)
            .positions(vec![2, 1, 1]);
        let results = run(&search).unwrap();
        assert_eq!(results[0], record(0, 0, 4.0, 2.0));
    }

    #[test]
    fn test_demotion_with_bounds() {
        let search = RankingSearch::new(SearchGoal::Demotion, vec![-1, -1], 1.0)
            .bounds(vec![-10.0, -10.0]);
        let results = run(&search).unwrap();
        assert_eq!(results[4], record(2, 0, -2.0, 3.0));
        // already last
        assert_eq!(results[0], record(0, 0, 0.0, 3.0));
    }

    #[test]
    fn test_validation() {
        let no_limit = RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 1.0);
        assert!(run(&no_limit).is_err());

        let bad_direction =
            RankingSearch::new(SearchGoal::Promotion, vec![1, 0], 1.0).max_modification(10.0);
        assert!(run(&bad_direction).is_err());

        let bad_position = RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 1.0)
            .max_modification(10.0)
            .positions(vec![1, 2, 4]);
        assert!(run(&bad_position).is_err());
    }

    #[test]
    fn test_non_finite_limits_rejected() {
        let is_invalid = |search: RankingSearch, field: &str| {
            let err = run(&search).unwrap_err();
            assert!(
                matches!(err, SensitivityError::InvalidValue { name, .. } if name == field),
                "{err:?}"
            );
        };
        let promote = || RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 1.0);

        is_invalid(promote().bounds(vec![f64::INFINITY, 5.0]), "bounds");
        is_invalid(promote().bounds(vec![5.0, f64::NAN]), "bounds");
        is_invalid(promote().max_modification(f64::INFINITY), "max_modification");
        is_invalid(
            RankingSearch::new(SearchGoal::Demotion, vec![-1, -1], f64::INFINITY)
                .bounds(vec![-10.0, -10.0]),
            "step",
        );
    }

    #[test]
    fn test_method_failure_aborts() {
        let failing = |_: &CallArgs| -> std::result::Result<Array1<f64>, MethodError> {
            Err("singular".into())
        };
        let m = matrix();
        let search =
            RankingSearch::new(SearchGoal::Promotion, vec![1, 1], 1.0).max_modification(100.0);
        let err = search
            .run(
                &m,
                &array![3.0, 2.0, 1.0],
                &failing,
                &CallArgs::new(m.clone()),
                &AverageRanker,
                RankOrder::Descending,
            )
            .unwrap_err();
        assert_eq!(err, SensitivityError::Evaluation("singular".into()));
    }
}
