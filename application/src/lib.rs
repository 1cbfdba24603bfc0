//! Application layer for consistency-probe
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{RetryPolicy, RunOptions};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    dataset_source::{DatasetError, DatasetSource},
    llm_gateway::{ChatRequest, GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    result_store::{ResultStore, StoreError},
    sleeper::Sleeper,
};
pub use use_cases::query_model::{QueryClient, QueryError};
pub use use_cases::report_results::{ReportOutcome, ReportResults, report};
pub use use_cases::run_experiment::{
    BatchEntry, ExperimentError, ExperimentOutcome, ExperimentRunner, ItemError, SkippedItem,
};
pub use use_cases::sampling::sample_items;
