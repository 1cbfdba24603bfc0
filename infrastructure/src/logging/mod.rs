//! Structured query logging.
//!
//! Provides [`JsonlQueryLogger`], a JSONL file writer that implements
//! the [`ConversationLogger`](probe_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlQueryLogger;
