//! Error types for the enrichment pipeline.

use thiserror::Error;

use xmrbus_rpc::RpcError;

use crate::publish::PublishError;

/// Errors that can terminate a pipeline run.
///
/// A run either fully succeeds (including publish), is cleanly skipped, or
/// fails with one of these before any publish side effect. Skips are not
/// errors; they are modeled by [`crate::resolver::Resolution::Skipped`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transport or protocol failure at the RPC gateway.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The wallet answered, but reported no incoming transfer for the id
    /// (unknown id, or only outgoing transfers).
    #[error("No incoming transfers found for txid {txid}")]
    NoIncomingTransfers { txid: String },

    /// The entity resolved correctly but was not delivered to the bus.
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    /// Returns `true` for failures of meaning rather than of transport:
    /// the RPC round trip worked, the data just cannot become an event.
    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::NoIncomingTransfers { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_errors_are_distinguishable() {
        let semantic = PipelineError::NoIncomingTransfers { txid: "t".into() };
        assert!(semantic.is_semantic());

        let rpc: PipelineError = RpcError::Http("connection refused".into()).into();
        assert!(!rpc.is_semantic());

        let publish: PipelineError = PublishError::Connect("no route".into()).into();
        assert!(!publish.is_semantic());
    }
}
