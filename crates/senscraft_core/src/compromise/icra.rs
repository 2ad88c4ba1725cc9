//! Iterative compromise ranking analysis (ICRA).
//!
//! Members are MCDM methods re-applied to the matrix of their own previous
//! preferences until every pair of consecutive members agrees. Method inputs
//! are named bindings looked up in a [`BindingTable`] rebuilt each round.

use ndarray::{Array1, Array2, Axis};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::{Result, SensitivityError};
use crate::evaluation::{Correlation, MethodError, RankOrder, rank_data, weighted_spearman};
use crate::validator;

pub const DEFAULT_ICRA_MAX_ITERS: usize = 1000;

/// Value bound to a parameter name
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Matrix(Array2<f64>),
    Vector(Array1<f64>),
    Scalar(f64),
}

impl Binding {
    #[must_use]
    pub fn as_matrix(&self) -> Option<&Array2<f64>> {
        match self {
            Binding::Matrix(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vector(&self) -> Option<&Array1<f64>> {
        match self {
            Binding::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Binding::Scalar(s) => Some(*s),
            _ => None,
        }
    }
}

/// Named method inputs.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: FxHashMap<String, Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, binding: Binding) -> Self {
        self.insert(name, binding);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) {
        self.entries.insert(name.into(), binding);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.entries.get(name)
    }

    /// Look up every name in order.
    pub fn resolve<'a>(&'a self, names: &[String]) -> Result<Vec<&'a Binding>> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| SensitivityError::MissingBinding(name.clone()))
            })
            .collect()
    }
}

/// An ICRA member evaluated over resolved bindings.
pub trait CompromiseMethod {
    fn preferences(&self, args: &[&Binding]) -> std::result::Result<Array1<f64>, MethodError>;
}

impl<F> CompromiseMethod for F
where
    F: Fn(&[&Binding]) -> std::result::Result<Array1<f64>, MethodError>,
{
    fn preferences(&self, args: &[&Binding]) -> std::result::Result<Array1<f64>, MethodError> {
        self(args)
    }
}

/// Builds a method from bindings, e.g. one whose reference set depends on the
/// current matrix.
pub trait MethodFactory {
    fn build(
        &self,
        args: &[&Binding],
    ) -> std::result::Result<Box<dyn CompromiseMethod>, MethodError>;
}

impl<F> MethodFactory for F
where
    F: Fn(&[&Binding]) -> std::result::Result<Box<dyn CompromiseMethod>, MethodError>,
{
    fn build(
        &self,
        args: &[&Binding],
    ) -> std::result::Result<Box<dyn CompromiseMethod>, MethodError> {
        self(args)
    }
}

/// How a member is invoked each round
pub enum MethodCall {
    Simple {
        method: Box<dyn CompromiseMethod>,
        params: Vec<String>,
    },
    /// Construct from `ctor_params`, then call with `call_params`
    Factory {
        factory: Box<dyn MethodFactory>,
        ctor_params: Vec<String>,
        call_params: Vec<String>,
    },
}

impl MethodCall {
    fn evaluate(&self, table: &BindingTable) -> Result<Array1<f64>> {
        let wrap = |e: MethodError| SensitivityError::Evaluation(e.to_string());
        match self {
            MethodCall::Simple { method, params } => {
                method.preferences(&table.resolve(params)?).map_err(wrap)
            }
            MethodCall::Factory {
                factory,
                ctor_params,
                call_params,
            } => {
                let method = factory.build(&table.resolve(ctor_params)?).map_err(wrap)?;
                method.preferences(&table.resolve(call_params)?).map_err(wrap)
            }
        }
    }
}

pub struct IcraMember {
    pub call: MethodCall,
    /// `Descending` when a higher preference is better
    pub order: RankOrder,
}

pub struct IcraOptions<'a> {
    pub max_iters: usize,
    pub correlation: &'a dyn Correlation,
    /// Weight of each member; equal when absent
    pub compromise_weights: Option<Array1<f64>>,
    /// Extra bindings available to every member
    pub bindings: BindingTable,
}

impl Default for IcraOptions<'_> {
    fn default() -> Self {
        Self {
            max_iters: DEFAULT_ICRA_MAX_ITERS,
            correlation: &weighted_spearman,
            compromise_weights: None,
            bindings: BindingTable::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IcraResults {
    pub initial_preferences: Array2<f64>,
    pub initial_rankings: Array2<f64>,
    pub final_preferences: Array2<f64>,
    pub final_rankings: Array2<f64>,
    pub iterations: usize,
    /// Initial matrix followed by one matrix per round
    pub all_preferences: Vec<Array2<f64>>,
    pub all_rankings: Vec<Array2<f64>>,
    /// Per round, each member's ranking against its previous ranking
    pub all_correlations: Vec<Array1<f64>>,
    pub converged: bool,
}

fn stack_columns(columns: &[Array1<f64>], rows: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, columns.len()), |(i, j)| columns[j][i])
}

/// Run ICRA over `preferences` and `rankings` (alternatives x members).
///
/// Every round binds `matrix` to the current preference matrix, `weights` to
/// the compromise weights, and `types` to the member orders as `±1`.
pub fn iterative_compromise(
    members: &[IcraMember],
    preferences: &Array2<f64>,
    rankings: &Array2<f64>,
    options: &IcraOptions<'_>,
) -> Result<IcraResults> {
    validator::check_not_empty("preferences", preferences)?;
    let (alternatives, m) = preferences.dim();
    validator::check_len("members", members.len(), m)?;
    validator::check_shape("rankings", rankings.dim(), (alternatives, m))?;
    let weights = match &options.compromise_weights {
        Some(w) => {
            validator::check_len("compromise_weights", w.len(), m)?;
            validator::check_weights(w)?;
            w.clone()
        }
        None => Array1::from_elem(m, 1.0 / m as f64),
    };
    let types: Array1<f64> = members.iter().map(|member| member.order.sign()).collect();

    let mut table = options.bindings.clone();
    table.insert("weights", Binding::Vector(weights));
    table.insert("types", Binding::Vector(types));

    let mut matrix = preferences.clone();
    let mut previous_rankings = rankings.clone();
    let mut all_preferences = vec![matrix.clone()];
    let mut all_rankings = vec![previous_rankings.clone()];
    let mut all_correlations = Vec::new();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iters {
        iterations += 1;
        table.insert("matrix", Binding::Matrix(matrix.clone()));

        let mut new_preferences = Vec::with_capacity(m);
        let mut new_rankings = Vec::with_capacity(m);
        for member in members {
            let prefs = member.call.evaluate(&table)?;
            if prefs.len() != alternatives {
                return Err(SensitivityError::calculation(
                    iterations,
                    format!("member returned {} preferences, expected {alternatives}", prefs.len()),
                ));
            }
            new_rankings.push(rank_data(&prefs, member.order));
            new_preferences.push(prefs);
        }

        let agree = new_rankings
            .windows(2)
            .all(|pair| options.correlation.correlate(&pair[0], &pair[1]) == 1.0);
        let self_correlations: Array1<f64> = new_rankings
            .iter()
            .zip(previous_rankings.axis_iter(Axis(1)))
            .map(|(ranking, previous)| options.correlation.correlate(ranking, &previous.to_owned()))
            .collect();

        matrix = stack_columns(&new_preferences, alternatives);
        previous_rankings = stack_columns(&new_rankings, alternatives);
        all_correlations.push(self_correlations);
        all_preferences.push(matrix.clone());
        all_rankings.push(previous_rankings.clone());

        if agree {
            converged = true;
            break;
        }
    }

    if converged {
        debug!(iterations, "ICRA compromise obtained");
    } else {
        warn!(
            max_iters = options.max_iters,
            "ICRA compromise not obtained within the iteration limit"
        );
    }

    Ok(IcraResults {
        initial_preferences: preferences.clone(),
        initial_rankings: rankings.clone(),
        final_preferences: matrix,
        final_rankings: previous_rankings,
        iterations,
        all_preferences,
        all_rankings,
        all_correlations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn matrix_arg(args: &[&Binding]) -> std::result::Result<Array2<f64>, MethodError> {
        args.first()
            .and_then(|b| b.as_matrix())
            .cloned()
            .ok_or_else(|| "expected a matrix".into())
    }

    fn row_sum(args: &[&Binding]) -> std::result::Result<Array1<f64>, MethodError> {
        Ok(matrix_arg(args)?.sum_axis(Axis(1)))
    }

    fn first_column(args: &[&Binding]) -> std::result::Result<Array1<f64>, MethodError> {
        Ok(matrix_arg(args)?.column(0).to_owned())
    }

    fn weighted(args: &[&Binding]) -> std::result::Result<Array1<f64>, MethodError> {
        let matrix = matrix_arg(args)?;
        let weights = args
            .get(1)
            .and_then(|b| b.as_vector())
            .ok_or("expected weights")?;
        Ok(matrix.dot(weights))
    }

    type Member = fn(&[&Binding]) -> std::result::Result<Array1<f64>, MethodError>;

    fn simple(method: Member, params: &[&str], order: RankOrder) -> IcraMember {
        IcraMember {
            call: MethodCall::Simple {
                method: Box::new(method),
                params: params.iter().map(|p| p.to_string()).collect(),
            },
            order,
        }
    }

    fn start() -> (Array2<f64>, Array2<f64>) {
        let prefs = array![[0.2, 0.7], [0.5, 0.1], [0.9, 0.4]];
        let ranks = array![[3.0, 1.0], [2.0, 3.0], [1.0, 2.0]];
        (prefs, ranks)
    }

    #[test]
    fn test_agreeing_members_converge_in_one_round() {
        let (prefs, ranks) = start();
        let members = vec![
            simple(row_sum, &["matrix"], RankOrder::Descending),
            simple(row_sum, &["matrix"], RankOrder::Descending),
        ];
        let options = IcraOptions::default();
        let result = iterative_compromise(&members, &prefs, &ranks, &options).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.all_preferences.len(), 2);
        assert_eq!(result.final_rankings.column(0), result.final_rankings.column(1));
        // row sums 0.9, 0.6, 1.3
        assert_eq!(result.final_rankings.column(0), array![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_opposed_members_stop_at_limit() {
        let (prefs, ranks) = start();
        let members = vec![
            simple(first_column, &["matrix"], RankOrder::Descending),
            simple(first_column, &["matrix"], RankOrder::Ascending),
        ];
        let options = IcraOptions {
            max_iters: 5,
            ..Default::default()
        };
        let result = iterative_compromise(&members, &prefs, &ranks, &options).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 5);
        assert_eq!(result.all_correlations.len(), 5);
        assert_eq!(result.all_rankings.len(), 6);
    }

    #[test]
    fn test_factory_members_see_bindings() {
        let (prefs, ranks) = start();
        type Built = std::result::Result<Box<dyn CompromiseMethod>, MethodError>;
        type Prefs = std::result::Result<Array1<f64>, MethodError>;
        let factory = |args: &[&Binding]| -> Built {
            let scale = args
                .first()
                .and_then(|b| b.as_scalar())
                .ok_or("expected scale")?;
            let scaled = move |inner: &[&Binding]| -> Prefs {
                Ok(weighted(inner)? * scale)
            };
            Ok(Box::new(scaled))
        };
        let members = vec![
            IcraMember {
                call: MethodCall::Factory {
                    factory: Box::new(factory),
                    ctor_params: vec!["scale".into()],
                    call_params: vec!["matrix".into(), "weights".into()],
                },
                order: RankOrder::Descending,
            },
            simple(weighted, &["matrix", "weights"], RankOrder::Descending),
        ];
        let options = IcraOptions {
            bindings: BindingTable::new().with("scale", Binding::Scalar(2.0)),
            ..Default::default()
        };
        let result = iterative_compromise(&members, &prefs, &ranks, &options).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_missing_binding() {
        let (prefs, ranks) = start();
        let members = vec![
            simple(row_sum, &["matrix"], RankOrder::Descending),
            simple(row_sum, &["reference"], RankOrder::Descending),
        ];
        let options = IcraOptions::default();
        let err = iterative_compromise(&members, &prefs, &ranks, &options).unwrap_err();
        assert_eq!(err, SensitivityError::MissingBinding("reference".into()));
    }

    #[test]
    fn test_member_count_must_match() {
        let (prefs, ranks) = start();
        let members = vec![simple(row_sum, &["matrix"], RankOrder::Descending)];
        assert!(iterative_compromise(&members, &prefs, &ranks, &IcraOptions::default()).is_err());
    }
}
