//! Percentage changes of matrix values.
//!
//! Two shapes of output are offered: a flat scenario list keyed by index
//! specs, and labelled scenario sets split by direction of change.

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combinations::{self, CombinationSource, cartesian_product};
use crate::error::Result;
use crate::model::{
    Change, ColumnParam, Direction, IndexSpec, Indexes, MatrixScenario, ScenarioSet, cell_label,
    grid_points, linspace, percentage_changes,
};
use crate::validator;

/// Apply percentage changes `new = v + v * change` to matrix cells.
///
/// For a single index, once a decrease drives the value negative no larger
/// decrease is tried for that cell. For groups, product tuples producing any
/// negative value are skipped.
pub fn percentage_modification(
    matrix: &Array2<f64>,
    percentages: &ColumnParam,
    direction: Option<&[i8]>,
    indexes: &Indexes,
    step: &ColumnParam,
) -> Result<Vec<MatrixScenario>> {
    validator::check_not_empty("matrix", matrix)?;
    let cols = matrix.ncols();
    percentages.check_positive("percentages", cols)?;
    step.check_positive("step", cols)?;
    if let Some(direction) = direction {
        validator::check_len("direction", direction.len(), cols)?;
        validator::check_directions("direction", direction)?;
    }
    let specs = indexes.resolve("indexes", cols)?;

    let changes: Vec<Vec<f64>> = (0..cols)
        .map(|c| percentage_changes(percentages.get(c), step.get(c), direction.map(|d| d[c])))
        .collect();

    let mut results = Vec::new();
    for alt in 0..matrix.nrows() {
        for spec in &specs {
            match spec {
                IndexSpec::Single(col) => {
                    let value = matrix[[alt, *col]];
                    let mut decreases_blocked = false;
                    for &change in &changes[*col] {
                        if change < 0.0 && decreases_blocked {
                            continue;
                        }
                        let new_value = value + value * change;
                        if new_value < 0.0 {
                            decreases_blocked |= change < 0.0;
                            continue;
                        }
                        let mut new_matrix = matrix.clone();
                        new_matrix[[alt, *col]] = new_value;
                        results.push(MatrixScenario {
                            alternative: alt,
                            criteria: spec.clone(),
                            change: Change::for_spec(spec, &[change]),
                            matrix: new_matrix,
                        });
                    }
                }
                IndexSpec::Group(group) => {
                    let lists: Vec<&[f64]> = group.iter().map(|&c| changes[c].as_slice()).collect();
                    for tuple in cartesian_product(&lists) {
                        let new_values: Vec<f64> = group
                            .iter()
                            .zip(&tuple)
                            .map(|(&c, change)| matrix[[alt, c]] * (1.0 + change))
                            .collect();
                        if new_values.iter().any(|v| *v < 0.0) {
                            continue;
                        }
                        let mut new_matrix = matrix.clone();
                        for (&c, v) in group.iter().zip(new_values) {
                            new_matrix[[alt, c]] = v;
                        }
                        results.push(MatrixScenario {
                            alternative: alt,
                            criteria: spec.clone(),
                            change: Change::for_spec(spec, &tuple),
                            matrix: new_matrix,
                        });
                    }
                }
            }
        }
    }

    debug!(scenarios = results.len(), "percentage modification generated");
    Ok(results)
}

/// Percentage bounds `(from, to)` for labelled sweeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PercentageBounds {
    /// Bounds for selected criteria; unlisted criteria are left untouched
    PerColumn(BTreeMap<usize, (f64, f64)>),
    PerCell(Vec<Vec<(f64, f64)>>),
}

/// Step sizes (in percent) for labelled sweeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepGrid {
    PerColumn(Vec<f64>),
    PerCell(Vec<Vec<f64>>),
}

impl StepGrid {
    fn get(&self, alt: usize, crit: usize) -> f64 {
        match self {
            StepGrid::PerColumn(steps) => steps[crit],
            StepGrid::PerCell(steps) => steps[alt][crit],
        }
    }

    fn check_against(&self, matrix: &Array2<f64>) -> Result<()> {
        let rows: Vec<&[f64]> = match self {
            StepGrid::PerColumn(steps) => vec![steps.as_slice()],
            StepGrid::PerCell(steps) => {
                validator::check_len("steps", steps.len(), matrix.nrows())?;
                steps.iter().map(Vec::as_slice).collect()
            }
        };
        for row in rows {
            validator::check_len("steps", row.len(), matrix.ncols())?;
            for step in row {
                validator::check_positive("steps", *step, 0.0)?;
            }
        }
        Ok(())
    }
}

/// Labelled scenarios split by sign of change
#[derive(Debug, Clone, Default)]
pub struct DirectionalScenarios<T> {
    pub increases: Option<ScenarioSet<T>>,
    pub decreases: Option<ScenarioSet<T>>,
}

/// Fractional thresholds per cell, empty where no bounds were given.
fn cell_thresholds(
    matrix: &Array2<f64>,
    bounds: &PercentageBounds,
    steps: &StepGrid,
) -> Result<Vec<Vec<Vec<f64>>>> {
    steps.check_against(matrix)?;
    let (rows, cols) = matrix.dim();

    let bound_at = |alt: usize, crit: usize| -> Option<(f64, f64)> {
        match bounds {
            PercentageBounds::PerColumn(map) => map.get(&crit).copied(),
            PercentageBounds::PerCell(cells) => Some(cells[alt][crit]),
        }
    };
    match bounds {
        PercentageBounds::PerColumn(map) => {
            for (&crit, &b) in map {
                validator::check_index("percentages", crit, cols)?;
                validator::check_bounds("percentages", b)?;
            }
        }
        PercentageBounds::PerCell(cells) => {
            validator::check_len("percentages", cells.len(), rows)?;
            for row in cells {
                validator::check_len("percentages", row.len(), cols)?;
                for b in row {
                    validator::check_bounds("percentages", *b)?;
                }
            }
        }
    }

    Ok((0..rows)
        .map(|alt| {
            (0..cols)
                .map(|crit| match bound_at(alt, crit) {
                    Some((from, to)) => {
                        let num = grid_points(from, to, steps.get(alt, crit));
                        linspace(from, to, num).into_iter().map(|p| p / 100.0).collect()
                    }
                    None => Vec::new(),
                })
                .collect()
        })
        .collect())
}

/// Labelled single-cell percentage sweeps, keyed `A[i]-C[j]-S[k]`.
///
/// A decrease that would make a value negative ends the sweep for that cell.
pub fn percentage_scenarios(
    matrix: &Array2<f64>,
    bounds: &PercentageBounds,
    steps: &StepGrid,
    direction: Direction,
) -> Result<DirectionalScenarios<Array2<f64>>> {
    validator::check_not_empty("matrix", matrix)?;
    let thresholds = cell_thresholds(matrix, bounds, steps)?;

    let generate = |sign: f64| {
        let mut set = ScenarioSet::new();
        for ((alt, crit), value) in matrix.indexed_iter() {
            for (k, pct) in thresholds[alt][crit].iter().enumerate() {
                let new_value = value + sign * value * pct;
                if sign < 0.0 && new_value < 0.0 {
                    break;
                }
                let mut new_matrix = matrix.clone();
                new_matrix[[alt, crit]] = new_value;
                set.insert(cell_label(alt, &[crit], k), new_matrix);
            }
        }
        set
    };

    Ok(DirectionalScenarios {
        increases: direction.increases().then(|| generate(1.0)),
        decreases: direction.decreases().then(|| generate(-1.0)),
    })
}

/// Labelled joint percentage sweeps over criteria combinations, keyed
/// `A[i]-C[j1-j2]-S[k]`.
///
/// Combinations default to every subset of two up to `ncols - 1` criteria.
/// Tuples whose decrease makes any value negative are skipped.
pub fn multiple_percentage_scenarios(
    matrix: &Array2<f64>,
    bounds: &PercentageBounds,
    steps: &StepGrid,
    source: Option<&CombinationSource>,
    direction: Direction,
) -> Result<DirectionalScenarios<Array2<f64>>> {
    validator::check_not_empty("matrix", matrix)?;
    let thresholds = cell_thresholds(matrix, bounds, steps)?;
    let default_source = CombinationSource::All { reserve: 1 };
    let source = source.unwrap_or(&default_source);
    let assignments = combinations::per_entity(matrix.nrows(), matrix.ncols(), source)?;

    let generate = |sign: f64| {
        let mut set = ScenarioSet::new();
        for (alt, combos) in &assignments {
            for combo in combos {
                let lists: Vec<&[f64]> = combo
                    .iter()
                    .map(|&c| thresholds[*alt][c].as_slice())
                    .collect();
                for (k, tuple) in cartesian_product(&lists).into_iter().enumerate() {
                    let new_values: Vec<f64> = combo
                        .iter()
                        .zip(&tuple)
                        .map(|(&c, pct)| matrix[[*alt, c]] * (1.0 + sign * pct))
                        .collect();
                    if sign < 0.0 && new_values.iter().any(|v| *v < 0.0) {
                        continue;
                    }
                    let mut new_matrix = matrix.clone();
                    for (&c, v) in combo.iter().zip(new_values) {
                        new_matrix[[*alt, c]] = v;
                    }
                    set.insert(cell_label(*alt, combo, k), new_matrix);
                }
            }
        }
        set
    };

    Ok(DirectionalScenarios {
        increases: direction.increases().then(|| generate(1.0)),
        decreases: direction.decreases().then(|| generate(-1.0)),
    })
}
