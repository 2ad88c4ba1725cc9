//! Integration tests for the senscraft scenario engines
//!
//! Tests are organized by topic:
//! - `pipeline` - Scenario generation feeding an injected method
//! - `compromise_flow` - Rankings from scenarios aggregated into compromises
//! - `properties` - Property tests for weight and matrix invariants

mod compromise_flow;
mod properties;
