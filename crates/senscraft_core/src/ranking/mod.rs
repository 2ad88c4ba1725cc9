//! Ranking analysis
//!
//! Stepwise promotion and demotion searches over single cells, and fuzzy
//! positional summaries of many rankings.

mod fuzzy;
mod search;

pub use fuzzy::*;
pub use search::*;
