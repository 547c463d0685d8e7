//! xmrbus-nats — NATS-backed implementation of the publisher boundary.
//!
//! Connection setup and teardown happen inside [`NatsPublisher::publish`];
//! the pipeline only ever sees bytes going to a channel. One connection per
//! invocation is enough because the process publishes at most one event.

use async_trait::async_trait;

use xmrbus_core::{BusPublisher, PublishError};

/// Publishes opaque payloads to a NATS subject.
pub struct NatsPublisher {
    url: String,
}

impl NatsPublisher {
    /// Create a publisher for the given NATS server URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The server URL this publisher connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn connect(&self) -> Result<async_nats::Client, PublishError> {
        async_nats::connect(&self.url)
            .await
            .map_err(|e| PublishError::Connect(e.to_string()))
    }
}

#[async_trait]
impl BusPublisher for NatsPublisher {
    async fn publish(&self, payload: &[u8], channel: &str) -> Result<(), PublishError> {
        let client = self.connect().await?;

        client
            .publish(channel.to_owned(), payload.to_vec().into())
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))?;

        // publish() only enqueues; flush before dropping the connection so
        // the message actually reaches the server.
        client
            .flush()
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))?;

        tracing::debug!(url = %self.url, channel, bytes = payload.len(), "event published");
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        match self.connect().await {
            Ok(client) => client.flush().await.is_ok(),
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "bus not reachable");
                false
            }
        }
    }
}
