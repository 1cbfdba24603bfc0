//! Consistency probe domain
//!
//! The scoring pipeline for one question item, leaves first:
//!
//! ```text
//! raw answer ──extract_answer──▶ Option<f64>
//!                                   │ (absent values dropped)
//!                                   ▼
//! per-slot samples ──aggregate──▶ median per slot
//!                                   │
//!                                   ▼
//! medians ──ScoringMode::score──▶ violation + strong flag ──▶ ResultRecord
//! ```

pub mod aggregate;
pub mod extraction;
pub mod question;
pub mod record;
pub mod report;
pub mod scoring;
