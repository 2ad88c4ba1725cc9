//! Command-line front end for senscraft
//!
//! Reads a YAML analysis file, runs one scenario engine from
//! `senscraft_core`, and writes the results as text or YAML.

pub mod commands;
pub mod config;
pub mod logging;
pub mod util;

pub use config::AnalysisFile;
pub use logging::init_logging;
