//! The versioned envelope placed around a canonical entity before publish.

use serde::{Deserialize, Serialize};

/// Schema version stamped on every published event.
pub const EVENT_VERSION: &str = "1.0";

/// The single channel all events are published to.
pub const EVENT_CHANNEL: &str = "monero";

/// The closed set of event types this bridge emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "transaction.created")]
    TransactionCreated,
    #[serde(rename = "block.created")]
    BlockCreated,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransactionCreated => write!(f, "transaction.created"),
            Self::BlockCreated => write!(f, "block.created"),
        }
    }
}

/// Wire shape: `{"type": ..., "version": "1.0", "data": ...}`.
///
/// Constructed immediately before publish and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub version: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(kind: EventKind, data: T) -> Self {
        Self {
            kind,
            version: EVENT_VERSION.into(),
            data,
        }
    }
}
