//! Scenario records produced by the modification and removal engines.

use ndarray::{Array1, Array2};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::IndexSpec;

/// Decimal places kept in change labels
pub const CHANGE_PRECISION: u32 = 6;

/// Round half to even, matching the rounding used for labels and outputs.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Applied change for a scenario: one value for a single index or one per
/// member of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Change {
    Value(f64),
    Values(Vec<f64>),
}

impl Change {
    /// Build a rounded label shaped after `spec`
    pub(crate) fn for_spec(spec: &IndexSpec, values: &[f64]) -> Self {
        match spec {
            IndexSpec::Single(_) => Change::Value(round_to(values[0], CHANGE_PRECISION)),
            IndexSpec::Group(_) => Change::Values(
                values
                    .iter()
                    .map(|v| round_to(*v, CHANGE_PRECISION))
                    .collect(),
            ),
        }
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        match self {
            Change::Value(v) => std::slice::from_ref(v),
            Change::Values(vs) => vs,
        }
    }
}

/// Matrix with one alternative's cell(s) replaced
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixScenario {
    pub alternative: usize,
    pub criteria: IndexSpec,
    pub change: Change,
    pub matrix: Array2<f64>,
}

/// Weight vector with targeted criteria changed and the rest rebalanced
#[derive(Debug, Clone, PartialEq)]
pub struct WeightScenario {
    pub criteria: IndexSpec,
    pub change: Change,
    pub weights: Array1<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeRemoval {
    pub removed: IndexSpec,
    pub matrix: Array2<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaRemoval {
    pub removed: IndexSpec,
    pub matrix: Array2<f64>,
    pub weights: Array1<f64>,
}

/// Label for a cell scenario: `A[alt]-C[c1-c2]-S[step]`
#[must_use]
pub fn cell_label(alternative: usize, criteria: &[usize], step: usize) -> String {
    format!(
        "A[{alternative}]-{}-{}",
        criteria_label(criteria),
        sample_label(step)
    )
}

/// Label for a criteria combination: `C[c1-c2-...]`
#[must_use]
pub fn criteria_label(criteria: &[usize]) -> String {
    let joined = criteria
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("-");
    format!("C[{joined}]")
}

#[must_use]
pub fn sample_label(step: usize) -> String {
    format!("S[{step}]")
}

/// String-keyed scenarios that keep insertion order.
#[derive(Debug, Clone)]
pub struct ScenarioSet<T> {
    entries: Vec<(String, T)>,
    lookup: FxHashMap<String, usize>,
}

impl<T> Default for ScenarioSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }
}

impl<T> ScenarioSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value stored under `label`.
    pub fn insert(&mut self, label: String, value: T) {
        if let Some(&pos) = self.lookup.get(&label) {
            self.entries[pos].1 = value;
        } else {
            self.lookup.insert(label.clone(), self.entries.len());
            self.entries.push((label, value));
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&T> {
        self.lookup.get(label).map(|&pos| &self.entries[pos].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    #[must_use]
    pub fn first(&self) -> Option<(&str, &T)> {
        self.entries.first().map(|(label, value)| (label.as_str(), value))
    }
}

impl<T> IntoIterator for ScenarioSet<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T> FromIterator<(String, T)> for ScenarioSet<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut set = ScenarioSet::new();
        for (label, value) in iter {
            set.insert(label, value);
        }
        set
    }
}
