//! Stochastic scenarios
//!
//! - `perturbed` - uniform noise on matrices and weights
//! - `distributions` - named weight distributions
//! - `monte_carlo` - sampled weight matrices
//!
//! Every function takes the random generator by `&mut` so seeded runs repeat.

mod distributions;
mod monte_carlo;
mod perturbed;

pub use distributions::*;
pub use monte_carlo::*;
pub use perturbed::*;
