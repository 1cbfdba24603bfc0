//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: chat models the probe can query
//! - [`error::DomainError`]: domain-level errors
//! - [`string::preview`]: short single-line previews for diagnostics

pub mod error;
pub mod model;
pub mod string;
