//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod query_model;
pub mod report_results;
pub mod run_experiment;
pub mod sampling;
