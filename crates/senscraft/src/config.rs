//! Analysis file schema
//!
//! One YAML file describes the decision problem and the settings of every
//! subcommand. Sections a subcommand does not use may be omitted.

use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use senscraft_core::combinations::CombinationSource;
use senscraft_core::compromise::HqOptions;
use senscraft_core::criteria::DEFAULT_GRID_PRECISION;
use senscraft_core::model::Indexes;
use senscraft_core::probabilistic::{
    DEFAULT_PERTURBATION_PRECISION, PerturbationScale, WeightDistribution,
};

fn default_grid_step() -> f64 {
    0.1
}

fn default_grid_precision() -> u32 {
    DEFAULT_GRID_PRECISION
}

fn default_simulations() -> usize {
    100
}

fn default_precision() -> u32 {
    DEFAULT_PERTURBATION_PRECISION
}

fn default_samples() -> usize {
    1000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsGridSection {
    /// Defaults to the number of weights, then matrix columns
    #[serde(default)]
    pub criteria: Option<usize>,
    #[serde(default = "default_grid_step")]
    pub step: f64,
    #[serde(default = "default_grid_precision")]
    pub precision: u32,
}

impl Default for WeightsGridSection {
    fn default() -> Self {
        Self {
            criteria: None,
            step: default_grid_step(),
            precision: default_grid_precision(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbationSection {
    #[serde(default = "default_simulations")]
    pub simulations: usize,
    #[serde(default = "default_precision")]
    pub precision: u32,
    #[serde(default)]
    pub matrix_scale: PerturbationScale,
    #[serde(default)]
    pub weights_scale: PerturbationScale,
}

impl Default for PerturbationSection {
    fn default() -> Self {
        Self {
            simulations: default_simulations(),
            precision: default_precision(),
            matrix_scale: PerturbationScale::default(),
            weights_scale: PerturbationScale::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSection {
    #[serde(default)]
    pub distribution: WeightDistribution,
    #[serde(default = "default_samples")]
    pub samples: usize,
}

impl Default for MonteCarloSection {
    fn default() -> Self {
        Self {
            distribution: WeightDistribution::default(),
            samples: default_samples(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemovalSection {
    #[serde(default)]
    pub criteria: Indexes,
    /// When set, criteria are removed in these combinations instead
    #[serde(default)]
    pub combinations: Option<CombinationSource>,
    #[serde(default)]
    pub alternatives: Indexes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompromiseSection {
    /// Alternatives in rows, one ranking per column
    #[serde(default)]
    pub rankings: Vec<Vec<f64>>,
    #[serde(default)]
    pub hq: HqOptions,
}

/// Top-level analysis file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFile {
    /// Alternatives in rows, criteria in columns
    #[serde(default)]
    pub matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub weights: Vec<f64>,
    /// Seed for every random draw; fresh entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub weights_grid: WeightsGridSection,
    #[serde(default)]
    pub perturbation: PerturbationSection,
    #[serde(default)]
    pub monte_carlo: MonteCarloSection,
    #[serde(default)]
    pub removal: RemovalSection,
    #[serde(default)]
    pub compromise: CompromiseSection,
}

/// Convert nested rows into a matrix, rejecting ragged or empty input.
pub fn rows_to_array(name: &str, rows: &[Vec<f64>]) -> color_eyre::Result<Array2<f64>> {
    let cols = rows.first().map(Vec::len).unwrap_or_default();
    if rows.is_empty() || cols == 0 {
        return Err(eyre!("`{name}` is missing or empty"));
    }
    if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
        return Err(eyre!("`{name}` row {bad} has {} values, expected {cols}", rows[bad].len()));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((rows.len(), cols), flat)?)
}

/// Convert a matrix back into nested rows for serialization.
#[must_use]
pub fn array_to_rows(array: &Array2<f64>) -> Vec<Vec<f64>> {
    array.rows().into_iter().map(|row| row.to_vec()).collect()
}

impl AnalysisFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&content).wrap_err_with(|| format!("failed to parse {}", path.display()))
    }

    pub fn matrix(&self) -> color_eyre::Result<Array2<f64>> {
        rows_to_array("matrix", &self.matrix)
    }

    pub fn weights(&self) -> color_eyre::Result<Array1<f64>> {
        if self.weights.is_empty() {
            return Err(eyre!("`weights` is missing or empty"));
        }
        Ok(Array1::from_vec(self.weights.clone()))
    }

    pub fn rankings(&self) -> color_eyre::Result<Array2<f64>> {
        rows_to_array("compromise.rankings", &self.compromise.rankings)
    }

    /// Criteria count for the weights grid
    pub fn grid_criteria(&self) -> color_eyre::Result<usize> {
        self.weights_grid
            .criteria
            .or_else(|| (!self.weights.is_empty()).then_some(self.weights.len()))
            .or_else(|| self.matrix.first().map(Vec::len))
            .ok_or_else(|| eyre!("`weights_grid.criteria` is required without weights or matrix"))
    }

    #[must_use]
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }
}
