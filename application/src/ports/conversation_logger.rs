//! Query transcript port
//!
//! Every prompt the [`QueryClient`](crate::use_cases::query_model::QueryClient)
//! sends ends in one transcript entry: the reply, each retried failure, or
//! the failure that ended the query. `tracing` stays the place for operator
//! diagnostics; the transcript is what an analysis of the answers reads.

use serde_json::Value;

/// One transcript entry
///
/// `event_type` is one of `query_response`, `query_retry` or `query_failed`.
/// The payload always carries `model` and `prompt`.
pub struct ConversationEvent {
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript entries
///
/// Writing must not fail the query that produced the entry, so `log`
/// returns nothing.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every entry
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
