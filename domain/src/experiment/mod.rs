//! Experiment configuration and per-item lifecycle.

pub mod config;
pub mod item_phase;
