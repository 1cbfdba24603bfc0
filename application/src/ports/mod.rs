//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod dataset_source;
pub mod llm_gateway;
pub mod progress;
pub mod result_store;
pub mod sleeper;
