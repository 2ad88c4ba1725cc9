//! Sensitivity and robustness analysis for multi-criteria decision-making
//!
//! This crate generates perturbed versions of a decision problem and studies
//! how evaluation outcomes respond. It supports:
//! - Decision matrix modification (discrete values, range sweeps, percentages)
//! - Criteria weight modification with automatic renormalization
//! - Removal of alternatives and criteria, singly or in combinations
//! - Random perturbations and Monte Carlo weight sampling
//! - Compromise rankings (Borda variants, dominance graph, HQ, ICRA)
//! - Ranking promotion and demotion searches
//!
//! MCDM methods are not part of the crate. Callers inject them through
//! [`evaluation::EvaluationMethod`], usually as closures:
//!
//! ```ignore
//! use senscraft_core::alternative::{CandidateValues, discrete_modification};
//! use senscraft_core::evaluation::{CallArgs, calculate_preference};
//! use senscraft_core::model::Indexes;
//!
//! let scenarios = discrete_modification(
//!     &matrix,
//!     &CandidateValues::PerColumn(vec![vec![2.0, 3.0], vec![1.0, 5.0], vec![3.0, 4.0]]),
//!     &Indexes::All,
//! )?;
//! let base = CallArgs::new(matrix.clone()).weights(weights).types(types);
//! let preferences = calculate_preference(&scenarios, &topsis, &base)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod combinations;
pub mod error;
pub mod evaluation;
pub mod validator;

// ============================================================================
// Scenario engines
// ============================================================================

pub mod alternative;
pub mod criteria;
pub mod probabilistic;

// ============================================================================
// Aggregation and analysis
// ============================================================================

pub mod compromise;
pub mod ranking;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{Result, SensitivityError};
pub use evaluation::{
    AverageRanker, CallArgs, Correlation, EvaluationMethod, MethodError, RankOrder, Ranker,
    calculate_preference, rank_data,
};
pub use model::{IndexSpec, Indexes, ScenarioSet};
