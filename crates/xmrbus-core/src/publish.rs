//! The publisher boundary and the event sink that feeds it.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::event::{Envelope, EventKind, EVENT_CHANNEL};
use crate::model::{Block, Transaction};

/// Errors that can occur while delivering an event to the bus.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The bus could not be reached.
    #[error("Bus connection error: {0}")]
    Connect(String),

    /// The envelope could not be serialized.
    #[error("Event encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The bus rejected or dropped the publish call.
    #[error("Bus publish error: {0}")]
    Publish(String),
}

/// Transport half of the publisher boundary: opaque bytes to a named
/// channel. Connection setup and teardown live behind the implementation
/// and are invisible to the pipeline.
#[async_trait]
pub trait BusPublisher: Send + Sync {
    async fn publish(&self, payload: &[u8], channel: &str) -> Result<(), PublishError>;

    /// Connectivity probe for the `ping` command.
    async fn is_ready(&self) -> bool;
}

/// Wraps canonical entities in the versioned envelope, serializes them, and
/// hands the bytes to the bus. Called at most once per successful,
/// non-skipped resolution.
pub struct EventSink<P> {
    bus: P,
}

impl<P: BusPublisher> EventSink<P> {
    pub fn new(bus: P) -> Self {
        Self { bus }
    }

    pub async fn publish_transaction(&self, tx: &Transaction) -> Result<(), PublishError> {
        self.publish(Envelope::new(EventKind::TransactionCreated, tx)).await
    }

    pub async fn publish_block(&self, block: &Block) -> Result<(), PublishError> {
        self.publish(Envelope::new(EventKind::BlockCreated, block)).await
    }

    async fn publish<T: Serialize>(&self, event: Envelope<&T>) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(&event)?;
        // TODO: split retriable from non-retriable failures once a retry
        // policy exists; today every publish failure is fatal.
        self.bus.publish(&payload, EVENT_CHANNEL).await
    }
}
