//! Compromise rankings
//!
//! Aggregate several rankings (or preference columns) of the same
//! alternatives into one. Inputs are `alternatives x rankings` matrices.
//!
//! - `borda`, `dominance`, `rank_position` - positional voting rules
//! - `improved_borda` - utility-weighted Borda over preferences
//! - `hq` - half-quadratic robust compromise with consensus indicators
//! - `icra` - iterative compromise re-applying MCDM methods

mod borda;
mod dominance;
mod hq;
mod icra;
mod improved_borda;
mod rank_position;

pub use borda::*;
pub use dominance::*;
pub use hq::*;
pub use icra::*;
pub use improved_borda::*;
pub use rank_position::*;

use ndarray::Array2;

use crate::error::{Result, SensitivityError};
use crate::validator;

fn check_rankings(rankings: &Array2<f64>) -> Result<()> {
    validator::check_not_empty("rankings", rankings)?;
    if rankings.iter().any(|r| !r.is_finite()) {
        return Err(SensitivityError::invalid(
            "rankings",
            "positions should be finite",
        ));
    }
    Ok(())
}
