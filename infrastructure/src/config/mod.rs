//! Configuration file loading for consistency-probe
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `PROBE_` (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./probe.toml` or `./.probe.toml`
//! 4. Global: `~/.config/consistency-probe/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileExperimentConfig, FileRetryConfig, FileRunConfig,
    FileServiceConfig, Severity,
};
pub use loader::ConfigLoader;
