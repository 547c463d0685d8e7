//! End-to-end orchestration: resolve, then publish at most once.

use xmrbus_rpc::{BlockSource, TransferSource};

use crate::config::ResolverConfig;
use crate::error::PipelineError;
use crate::publish::{BusPublisher, EventSink};
use crate::resolver::{resolve_block, resolve_transaction, Resolution};

/// How a pipeline run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Published,
    Skipped,
}

/// Fetch extra context about a wallet transaction and publish it as a
/// `transaction.created` event.
pub async fn process_txid<S, P>(
    txid: &str,
    cfg: &ResolverConfig,
    source: &S,
    sink: &EventSink<P>,
) -> Result<Outcome, PipelineError>
where
    S: TransferSource,
    P: BusPublisher,
{
    match resolve_transaction(txid, cfg, source).await? {
        Resolution::Resolved(tx) => {
            tracing::info!(
                txid = %tx.txid,
                height = tx.height,
                destinations = tx.destinations.len(),
                "publishing transaction event"
            );
            sink.publish_transaction(&tx).await?;
            Ok(Outcome::Published)
        }
        Resolution::Skipped { .. } => Ok(Outcome::Skipped),
    }
}

/// Fetch a block and its bounded ancestry and publish it as a
/// `block.created` event.
pub async fn process_block_hash<S, P>(
    block_hash: &str,
    cfg: &ResolverConfig,
    source: &S,
    sink: &EventSink<P>,
) -> Result<Outcome, PipelineError>
where
    S: BlockSource,
    P: BusPublisher,
{
    match resolve_block(block_hash, cfg, source).await? {
        Resolution::Resolved(block) => {
            tracing::info!(
                hash = %block.hash,
                height = block.height,
                ancestors = block.ancestors.len(),
                txs = block.tx_hashes.len(),
                "publishing block event"
            );
            sink.publish_block(&block).await?;
            Ok(Outcome::Published)
        }
        Resolution::Skipped { .. } => Ok(Outcome::Skipped),
    }
}
