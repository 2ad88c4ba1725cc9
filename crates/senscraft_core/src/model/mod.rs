//! Shared data types for scenario generation
//!
//! - `index` - index specifications and selections
//! - `params` - per-column parameters and sweep helpers
//! - `scenario` - scenario records, labels, and keyed scenario sets

mod index;
mod params;
mod scenario;

pub use index::*;
pub use params::*;
pub use scenario::*;
