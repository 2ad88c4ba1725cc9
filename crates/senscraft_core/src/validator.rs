//! Precondition checks shared by every engine.
//!
//! Each helper names the offending parameter so callers get a precise
//! message before any scenario work starts.

use ndarray::{Array1, Array2};

use crate::error::{Result, SensitivityError};
use crate::model::IndexSpec;

/// Decimal places used when checking that weights sum to one
pub const WEIGHTS_SUM_PRECISION: u32 = 3;

pub fn check_len(name: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(SensitivityError::shape(name, expected, actual));
    }
    Ok(())
}

pub fn check_shape(
    name: &'static str,
    actual: (usize, usize),
    expected: (usize, usize),
) -> Result<()> {
    if actual != expected {
        return Err(SensitivityError::shape(
            name,
            format!("{expected:?}"),
            format!("{actual:?}"),
        ));
    }
    Ok(())
}

pub fn check_not_empty(name: &'static str, matrix: &Array2<f64>) -> Result<()> {
    if matrix.nrows() == 0 || matrix.ncols() == 0 {
        return Err(SensitivityError::invalid(name, "matrix should not be empty"));
    }
    Ok(())
}

pub fn check_index(name: &'static str, index: usize, size: usize) -> Result<()> {
    if index >= size {
        return Err(SensitivityError::Index { name, index, size });
    }
    Ok(())
}

/// Validate every member of every spec; groups must not repeat an index.
pub fn check_indexes(name: &'static str, specs: &[IndexSpec], size: usize) -> Result<()> {
    for spec in specs {
        check_combination(name, spec.indices(), size)?;
    }
    Ok(())
}

pub fn check_combination(name: &'static str, combination: &[usize], size: usize) -> Result<()> {
    if combination.is_empty() {
        return Err(SensitivityError::invalid(name, "combination should not be empty"));
    }
    for (pos, &idx) in combination.iter().enumerate() {
        check_index(name, idx, size)?;
        if combination[..pos].contains(&idx) {
            return Err(SensitivityError::invalid(
                name,
                format!("index {idx} repeated in combination {combination:?}"),
            ));
        }
    }
    Ok(())
}

/// Weights must be non-negative and sum to one at [`WEIGHTS_SUM_PRECISION`] decimals.
pub fn check_weights(weights: &Array1<f64>) -> Result<()> {
    if weights.is_empty() {
        return Err(SensitivityError::invalid("weights", "vector should not be empty"));
    }
    check_non_negative("weights", weights.iter().copied())?;
    let sum = weights.sum();
    if crate::model::round_to(sum, WEIGHTS_SUM_PRECISION) != 1.0 {
        return Err(SensitivityError::WeightsSum { sum });
    }
    Ok(())
}

pub fn check_non_negative(name: &'static str, values: impl IntoIterator<Item = f64>) -> Result<()> {
    match values.into_iter().find(|v| !(*v >= 0.0)) {
        Some(bad) => Err(SensitivityError::invalid(
            name,
            format!("values should be non-negative, got {bad}"),
        )),
        None => Ok(()),
    }
}

pub fn check_finite(name: &'static str, values: impl IntoIterator<Item = f64>) -> Result<()> {
    match values.into_iter().find(|v| !v.is_finite()) {
        Some(bad) => Err(SensitivityError::invalid(
            name,
            format!("values should be finite, got {bad}"),
        )),
        None => Ok(()),
    }
}

/// Value must be strictly greater than `floor`.
pub fn check_positive(name: &'static str, value: f64, floor: f64) -> Result<()> {
    if !(value > floor) {
        return Err(SensitivityError::invalid(
            name,
            format!("should be greater than {floor}, got {value}"),
        ));
    }
    Ok(())
}

pub fn check_in_range(name: &'static str, value: f64, lower: f64, upper: f64) -> Result<()> {
    if !(lower..=upper).contains(&value) {
        return Err(SensitivityError::invalid(
            name,
            format!("{value} should lie within [{lower}, {upper}]"),
        ));
    }
    Ok(())
}

pub fn check_in_list<T: PartialEq + std::fmt::Debug>(
    name: &'static str,
    value: &T,
    allowed: &[T],
) -> Result<()> {
    if !allowed.contains(value) {
        return Err(SensitivityError::invalid(
            name,
            format!("{value:?} not in {allowed:?}"),
        ));
    }
    Ok(())
}

/// Direction entries may only be `1` or `-1`.
pub fn check_directions(name: &'static str, directions: &[i8]) -> Result<()> {
    for direction in directions {
        check_in_list(name, direction, &[-1, 1])?;
    }
    Ok(())
}

/// Lower bound must not exceed upper bound.
pub fn check_bounds(name: &'static str, (lower, upper): (f64, f64)) -> Result<()> {
    if !(lower <= upper) {
        return Err(SensitivityError::invalid(
            name,
            format!("lower bound {lower} exceeds upper bound {upper}"),
        ));
    }
    Ok(())
}

/// Every name in `required` must be present in `available`.
pub fn check_keys<'a>(
    required: &[&str],
    available: impl IntoIterator<Item = &'a str> + Clone,
) -> Result<()> {
    for key in required {
        if !available.clone().into_iter().any(|k| k == *key) {
            return Err(SensitivityError::MissingBinding((*key).to_string()));
        }
    }
    Ok(())
}
