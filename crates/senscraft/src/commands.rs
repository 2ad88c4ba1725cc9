//! Subcommand handlers
//!
//! Each handler reads what it needs from the analysis file, runs one core
//! engine, and renders the result as text ready to be written out.

use color_eyre::eyre::eyre;
use serde::Serialize;
use tracing::info;

use senscraft_core::alternative::remove_alternatives;
use senscraft_core::compromise::{borda, dominance_directed_graph, hq_compromise, rank_position};
use senscraft_core::criteria::{
    criteria_removal_scenarios, format_scenario_line, remove_criteria, weights_grid,
};
use senscraft_core::model::{IndexSpec, criteria_label};
use senscraft_core::probabilistic::{monte_carlo_weights, perturbed_matrix, perturbed_weights};

use crate::config::{AnalysisFile, array_to_rows};

#[derive(Debug, Serialize)]
pub struct CriteriaRemovalReport {
    pub label: String,
    pub weights: Vec<f64>,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct AlternativeRemovalReport {
    pub removed: IndexSpec,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct HqReport {
    pub consensus: f64,
    pub trust: f64,
    pub weights: Vec<f64>,
    pub ranking: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Serialize)]
pub struct CompromiseReport {
    pub borda: Vec<f64>,
    pub dominance_directed_graph: Vec<f64>,
    pub rank_position: Vec<f64>,
    pub hq: HqReport,
}

fn to_yaml<T: Serialize>(value: &T) -> color_eyre::Result<String> {
    serde_saphyr::to_string(value).map_err(|e| eyre!("failed to serialize results: {e}"))
}

/// Every weight vector on the configured grid, one `(w1, w2, ...)` per line
pub fn run_weights_grid(file: &AnalysisFile) -> color_eyre::Result<String> {
    let section = &file.weights_grid;
    let criteria = file.grid_criteria()?;
    let grid = weights_grid(criteria, section.step, section.precision)?;
    info!(criteria, step = section.step, scenarios = grid.len(), "weights grid ready");

    let mut out = String::new();
    for weights in &grid {
        out.push_str(&format_scenario_line(weights));
        out.push('\n');
    }
    Ok(out)
}

pub fn run_perturb_matrix(file: &AnalysisFile) -> color_eyre::Result<String> {
    let matrix = file.matrix()?;
    let section = &file.perturbation;
    let mut rng = file.rng();
    let results = perturbed_matrix(
        &matrix,
        section.simulations,
        section.precision,
        &section.matrix_scale,
        &mut rng,
    )?;
    info!(simulations = results.len(), "matrix perturbations ready");
    let rows: Vec<Vec<Vec<f64>>> = results.iter().map(array_to_rows).collect();
    to_yaml(&rows)
}

pub fn run_perturb_weights(file: &AnalysisFile) -> color_eyre::Result<String> {
    let weights = file.weights()?;
    let section = &file.perturbation;
    let mut rng = file.rng();
    let results = perturbed_weights(
        &weights,
        section.simulations,
        section.precision,
        &section.weights_scale,
        &mut rng,
    )?;
    info!(simulations = results.nrows(), "weight perturbations ready");
    to_yaml(&array_to_rows(&results))
}

pub fn run_monte_carlo(file: &AnalysisFile) -> color_eyre::Result<String> {
    let criteria = match (file.weights.len(), file.matrix.first()) {
        (0, Some(row)) => row.len(),
        (n, _) => n,
    };
    let section = &file.monte_carlo;
    let mut rng = file.rng();
    let samples = monte_carlo_weights(criteria, &section.distribution, section.samples, &mut rng)?;
    info!(
        distribution = section.distribution.name(),
        samples = samples.nrows(),
        "monte carlo weights ready"
    );
    to_yaml(&array_to_rows(&samples))
}

pub fn run_remove_criteria(file: &AnalysisFile) -> color_eyre::Result<String> {
    let matrix = file.matrix()?;
    let weights = file.weights()?;

    let reports: Vec<CriteriaRemovalReport> = match &file.removal.combinations {
        Some(source) => criteria_removal_scenarios(&matrix, &weights, Some(source))?
            .into_iter()
            .map(|(label, removal)| CriteriaRemovalReport {
                label,
                weights: removal.weights.to_vec(),
                matrix: array_to_rows(&removal.matrix),
            })
            .collect(),
        None => remove_criteria(&matrix, &weights, &file.removal.criteria)?
            .into_iter()
            .map(|removal| CriteriaRemovalReport {
                label: criteria_label(removal.removed.indices()),
                weights: removal.weights.to_vec(),
                matrix: array_to_rows(&removal.matrix),
            })
            .collect(),
    };
    info!(scenarios = reports.len(), "criteria removal ready");
    to_yaml(&reports)
}

pub fn run_remove_alternatives(file: &AnalysisFile) -> color_eyre::Result<String> {
    let matrix = file.matrix()?;
    let reports: Vec<AlternativeRemovalReport> =
        remove_alternatives(&matrix, &file.removal.alternatives)?
            .into_iter()
            .map(|removal| AlternativeRemovalReport {
                removed: removal.removed,
                matrix: array_to_rows(&removal.matrix),
            })
            .collect();
    info!(scenarios = reports.len(), "alternative removal ready");
    to_yaml(&reports)
}

pub fn run_compromise(file: &AnalysisFile) -> color_eyre::Result<String> {
    let rankings = file.rankings()?;
    let hq = hq_compromise(&rankings, &file.compromise.hq)?;
    let report = CompromiseReport {
        borda: borda(&rankings)?.to_vec(),
        dominance_directed_graph: dominance_directed_graph(&rankings)?.to_vec(),
        rank_position: rank_position(&rankings)?.to_vec(),
        hq: HqReport {
            consensus: hq.consensus,
            trust: hq.trust,
            weights: hq.weights.to_vec(),
            ranking: hq.ranking.to_vec(),
            iterations: hq.iterations,
            converged: hq.converged,
        },
    };
    info!(alternatives = rankings.nrows(), "compromise rankings ready");
    to_yaml(&report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> AnalysisFile {
        AnalysisFile {
            matrix: vec![
                vec![3.0, 2.0, 5.0, 4.0],
                vec![1.0, 4.0, 2.0, 6.0],
                vec![2.0, 5.0, 3.0, 1.0],
            ],
            weights: vec![0.25, 0.25, 0.2, 0.3],
            seed: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_weights_grid_lines() {
        let mut file = file();
        file.weights_grid.criteria = Some(3);
        file.weights_grid.step = 0.5;
        let out = run_weights_grid(&file).unwrap();
        let mut lines: Vec<&str> = out.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines.len(), 6);
        assert!(lines.contains(&"(0.5, 0.0, 0.5)"));
        assert!(lines.contains(&"(1.0, 0.0, 0.0)"));
    }

    #[test]
    fn test_seeded_perturbations_repeat() {
        let mut file = file();
        file.perturbation.simulations = 4;
        assert_eq!(
            run_perturb_matrix(&file).unwrap(),
            run_perturb_matrix(&file).unwrap()
        );
        assert_eq!(
            run_perturb_weights(&file).unwrap(),
            run_perturb_weights(&file).unwrap()
        );
    }

    #[test]
    fn test_monte_carlo_uses_weight_count() {
        let mut file = file();
        file.monte_carlo.samples = 3;
        let out = run_monte_carlo(&file).unwrap();
        let rows: Vec<Vec<f64>> = serde_saphyr::from_str(&out).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 4));
    }

    #[test]
    fn test_remove_criteria_labels() {
        let out = run_remove_criteria(&file()).unwrap();
        assert!(out.contains("C[0]"));
        assert!(out.contains("C[3]"));
    }

    #[test]
    fn test_remove_alternatives_requires_matrix() {
        let file = AnalysisFile::default();
        assert!(run_remove_alternatives(&file).is_err());
    }

    #[test]
    fn test_compromise_report() {
        let mut file = file();
        file.compromise.rankings = vec![
            vec![3.0, 2.0, 3.0],
            vec![4.0, 4.0, 4.0],
            vec![2.0, 3.0, 2.0],
            vec![1.0, 1.0, 1.0],
        ];
        let out = run_compromise(&file).unwrap();
        assert!(out.contains("borda"));
        assert!(out.contains("converged"));
    }
}
