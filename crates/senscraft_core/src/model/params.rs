use serde::{Deserialize, Serialize};

use crate::error::{Result, SensitivityError};

/// A scalar applied to every column, or one value per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnParam {
    Uniform(f64),
    PerColumn(Vec<f64>),
}

impl ColumnParam {
    #[must_use]
    pub fn get(&self, column: usize) -> f64 {
        match self {
            ColumnParam::Uniform(value) => *value,
            ColumnParam::PerColumn(values) => values[column],
        }
    }

    /// Check length against `columns` and that every value is strictly positive.
    pub fn check_positive(&self, name: &'static str, columns: usize) -> Result<()> {
        let values: &[f64] = match self {
            ColumnParam::Uniform(value) => std::slice::from_ref(value),
            ColumnParam::PerColumn(values) => {
                if values.len() != columns {
                    return Err(SensitivityError::shape(name, columns, values.len()));
                }
                values
            }
        };
        match values.iter().find(|v| !(**v > 0.0) || !v.is_finite()) {
            Some(bad) => Err(SensitivityError::invalid(
                name,
                format!("values should be positive and finite, got {bad}"),
            )),
            None => Ok(()),
        }
    }
}

impl From<f64> for ColumnParam {
    fn from(value: f64) -> Self {
        ColumnParam::Uniform(value)
    }
}

impl From<Vec<f64>> for ColumnParam {
    fn from(values: Vec<f64>) -> Self {
        ColumnParam::PerColumn(values)
    }
}

/// Which signs of percentage change a keyed sweep produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increases,
    Decreases,
    #[default]
    Both,
}

impl Direction {
    #[must_use]
    pub fn increases(self) -> bool {
        matches!(self, Direction::Increases | Direction::Both)
    }

    #[must_use]
    pub fn decreases(self) -> bool {
        matches!(self, Direction::Decreases | Direction::Both)
    }
}

/// Evenly spaced values from `start` to `stop` inclusive.
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// `start, start + step, ...` up to `stop` inclusive, with accumulated
/// floating-point overshoot filtered out.
pub(crate) fn stepped_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let count = ((stop + step - start) / step).ceil().max(0.0) as usize;
    (0..count)
        .map(|i| super::round_to(start + step * i as f64, 12))
        .filter(|v| *v >= start && *v <= stop)
        .collect()
}

/// Fractional changes for thresholds `step, 2 * step, ... <= percentage`.
///
/// With a direction only that sign is used; without one each threshold
/// yields a decrease followed by an increase.
pub(crate) fn percentage_changes(percentage: f64, step: f64, direction: Option<i8>) -> Vec<f64> {
    let thresholds = stepped_range(step, percentage, step);
    match direction {
        Some(sign) => thresholds
            .iter()
            .map(|t| f64::from(sign) * t / 100.0)
            .collect(),
        None => thresholds
            .iter()
            .flat_map(|t| [-t / 100.0, t / 100.0])
            .collect(),
    }
}

/// Number of grid points `floor((stop - start) / step) + 1` tolerant of
/// representation error in the quotient.
pub(crate) fn grid_points(start: f64, stop: f64, step: f64) -> usize {
    ((stop - start) / step + 1e-9).floor().max(0.0) as usize + 1
}
