//! Lifecycle of a question item inside an experiment run

use serde::{Deserialize, Serialize};

/// Phase of a single question item
///
/// ```text
/// Pending → Querying → Extracting → Aggregating → Scoring → Recorded
///               │                        │
///               └────────── Skipped ◀────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemPhase {
    Pending,
    Querying,
    Extracting,
    Aggregating,
    Scoring,
    Recorded,
    Skipped,
}

impl ItemPhase {
    pub fn as_str(&self) -> &str {
        match self {
            ItemPhase::Pending => "pending",
            ItemPhase::Querying => "querying",
            ItemPhase::Extracting => "extracting",
            ItemPhase::Aggregating => "aggregating",
            ItemPhase::Scoring => "scoring",
            ItemPhase::Recorded => "recorded",
            ItemPhase::Skipped => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemPhase::Recorded | ItemPhase::Skipped)
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_advance_to(&self, next: ItemPhase) -> bool {
        use ItemPhase::*;
        matches!(
            (*self, next),
            (Pending, Querying)
                | (Querying, Extracting)
                | (Extracting, Aggregating)
                | (Aggregating, Scoring)
                | (Scoring, Recorded)
                | (Querying | Extracting | Aggregating | Scoring, Skipped)
        )
    }
}

impl std::fmt::Display for ItemPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
