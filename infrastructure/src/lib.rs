//! Infrastructure layer for consistency-probe
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openrouter;
pub mod runtime;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileExperimentConfig, FileRetryConfig, FileRunConfig,
    FileServiceConfig, Severity,
};
pub use logging::JsonlQueryLogger;
pub use openrouter::{DEFAULT_BASE_URL, error::OpenRouterError, gateway::OpenRouterGateway};
pub use runtime::TokioSleeper;
pub use storage::{JsonDatasetLoader, JsonResultStore};
