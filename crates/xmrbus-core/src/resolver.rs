//! The enrichment pipeline's two resolvers.
//!
//! Both apply the same height-floor policy to the *target* entity only:
//! a target below the floor resolves to [`Resolution::Skipped`] and nothing
//! is published. Ancestors are never height-filtered; once the target passes
//! the gate they are always fetched and included.

use xmrbus_rpc::{BlockSource, TransferSource};

use crate::config::ResolverConfig;
use crate::error::PipelineError;
use crate::model::{Block, Transaction};

/// Outcome of a resolution: an entity ready to publish, or a clean skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Resolved(T),
    /// The target sits below the height floor. A normal outcome, not an
    /// error; the caller publishes nothing.
    Skipped { height: u64, floor: u64 },
}

impl<T> Resolution<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Resolve a transaction id into its canonical incoming view.
pub async fn resolve_transaction<S: TransferSource>(
    txid: &str,
    cfg: &ResolverConfig,
    source: &S,
) -> Result<Resolution<Transaction>, PipelineError> {
    let transfers = source.transfers_by_txid(txid).await?;

    let tx = Transaction::from_transfers(&transfers).ok_or_else(|| {
        PipelineError::NoIncomingTransfers {
            txid: txid.to_owned(),
        }
    })?;

    if tx.height < cfg.ignore_below_height {
        tracing::info!(
            txid,
            height = tx.height,
            floor = cfg.ignore_below_height,
            "transaction below height floor, skipping"
        );
        return Ok(Resolution::Skipped {
            height: tx.height,
            floor: cfg.ignore_below_height,
        });
    }

    Ok(Resolution::Resolved(tx))
}

/// Resolve a block hash into its canonical view with bounded ancestry.
///
/// The order of operations is fixed: fetch target, height-gate, genesis
/// check, ancestor fetch. Gating before the ancestor fetch keeps the RPC
/// cost of a filtered block at a single call; a published block costs at
/// most two regardless of `max_ancestors`.
pub async fn resolve_block<S: BlockSource>(
    block_hash: &str,
    cfg: &ResolverConfig,
    source: &S,
) -> Result<Resolution<Block>, PipelineError> {
    let raw = source.block_by_hash(block_hash).await?;
    let height = raw.header.height;

    if height < cfg.ignore_below_height {
        tracing::info!(
            hash = block_hash,
            height,
            floor = cfg.ignore_below_height,
            "block below height floor, skipping"
        );
        return Ok(Resolution::Skipped {
            height,
            floor: cfg.ignore_below_height,
        });
    }

    // Genesis has no ancestors by definition.
    if height == 0 {
        return Ok(Resolution::Resolved(Block::from_parts(raw, Vec::new())));
    }

    let ancestors = if cfg.max_ancestors == 0 {
        Vec::new()
    } else {
        // One batched call for the whole window. A response shorter than the
        // window (chain shorter than requested) is accepted as-is.
        let end = height - 1;
        let start = height.saturating_sub(cfg.max_ancestors);
        source.headers_in_range(start, end).await?
    };

    Ok(Resolution::Resolved(Block::from_parts(raw, ancestors)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use xmrbus_rpc::{BlockHeader, RawBlock, RpcError, TransferRecord};

    fn transfer(txid: &str, amount: i64, address: &str, tag: &str, height: u64) -> TransferRecord {
        TransferRecord {
            txid: txid.into(),
            address: address.into(),
            amount,
            confirmations: 3,
            height,
            timestamp: 1_535_918_400,
            unlock_time: 0,
            transfer_type: tag.into(),
        }
    }

    fn header(height: u64) -> BlockHeader {
        BlockHeader {
            hash: format!("hash{height}"),
            height,
            timestamp: height * 120,
            prev_hash: if height == 0 { String::new() } else { format!("hash{}", height - 1) },
        }
    }

    // ─── Transaction resolver ────────────────────────────────────────────────

    struct StubTransfers {
        records: Vec<TransferRecord>,
        calls: AtomicU32,
    }

    impl StubTransfers {
        fn new(records: Vec<TransferRecord>) -> Self {
            Self { records, calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl TransferSource for StubTransfers {
        async fn transfers_by_txid(&self, _txid: &str) -> Result<Vec<TransferRecord>, RpcError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.records.clone())
        }
    }

    struct BrokenTransfers;

    #[async_trait]
    impl TransferSource for BrokenTransfers {
        async fn transfers_by_txid(&self, _txid: &str) -> Result<Vec<TransferRecord>, RpcError> {
            Err(RpcError::Http("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn tx_filters_to_incoming_destinations() {
        let source = StubTransfers::new(vec![
            transfer("tx1", 2, "addr1", "in", 5),
            transfer("tx1", 4, "addr2", "out", 5),
        ]);
        let cfg = ResolverConfig::default();

        match resolve_transaction("tx1", &cfg, &source).await.unwrap() {
            Resolution::Resolved(tx) => {
                assert_eq!(tx.txid, "tx1");
                assert_eq!(tx.destinations.len(), 1);
                assert_eq!(tx.destinations[0].amount, 2);
                assert_eq!(tx.destinations[0].address, "addr1");
            }
            other => panic!("expected resolved transaction, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tx_without_incoming_is_semantic_error() {
        let source = StubTransfers::new(vec![transfer("tx1", 4, "addr2", "out", 5)]);
        let cfg = ResolverConfig::default();

        let err = resolve_transaction("tx1", &cfg, &source).await.unwrap_err();
        assert!(err.is_semantic());
        match err {
            PipelineError::NoIncomingTransfers { txid } => assert_eq!(txid, "tx1"),
            other => panic!("expected semantic error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tx_unknown_id_is_semantic_error() {
        let source = StubTransfers::new(vec![]);
        let cfg = ResolverConfig::default();
        let err = resolve_transaction("nope", &cfg, &source).await.unwrap_err();
        assert!(err.is_semantic());
    }

    #[tokio::test]
    async fn tx_below_floor_skips() {
        let source = StubTransfers::new(vec![transfer("tx1", 2, "addr1", "in", 3)]);
        let cfg = ResolverConfig { ignore_below_height: 5, max_ancestors: 0 };

        let resolution = resolve_transaction("tx1", &cfg, &source).await.unwrap();
        assert_eq!(resolution, Resolution::Skipped { height: 3, floor: 5 });
        assert_eq!(source.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn tx_at_floor_resolves() {
        let source = StubTransfers::new(vec![transfer("tx1", 2, "addr1", "in", 5)]);
        let cfg = ResolverConfig { ignore_below_height: 5, max_ancestors: 0 };

        assert!(!resolve_transaction("tx1", &cfg, &source).await.unwrap().is_skipped());
    }

    #[tokio::test]
    async fn tx_rpc_error_propagates() {
        let cfg = ResolverConfig::default();
        let err = resolve_transaction("tx1", &cfg, &BrokenTransfers).await.unwrap_err();
        assert!(!err.is_semantic());
        assert!(matches!(err, PipelineError::Rpc(RpcError::Http(_))));
    }

    // ─── Block resolver ──────────────────────────────────────────────────────

    struct StubChain {
        tip_height: u64,
        block_calls: AtomicU32,
        range_calls: AtomicU32,
        last_range: Mutex<Option<(u64, u64)>>,
        ascending: bool,
    }

    impl StubChain {
        fn new(tip_height: u64) -> Self {
            Self {
                tip_height,
                block_calls: AtomicU32::new(0),
                range_calls: AtomicU32::new(0),
                last_range: Mutex::new(None),
                ascending: true,
            }
        }

        fn descending(mut self) -> Self {
            self.ascending = false;
            self
        }
    }

    #[async_trait]
    impl BlockSource for StubChain {
        async fn block_by_hash(&self, _hash: &str) -> Result<RawBlock, RpcError> {
            self.block_calls.fetch_add(1, Ordering::Relaxed);
            Ok(RawBlock {
                header: header(self.tip_height),
                tx_hashes: vec![format!("tx-at-{}", self.tip_height)],
            })
        }

        async fn headers_in_range(&self, start: u64, end: u64) -> Result<Vec<BlockHeader>, RpcError> {
            self.range_calls.fetch_add(1, Ordering::Relaxed);
            *self.last_range.lock().unwrap() = Some((start, end));
            let mut headers: Vec<BlockHeader> = (start..=end).map(header).collect();
            if !self.ascending {
                headers.reverse();
            }
            Ok(headers)
        }
    }

    struct BrokenChain {
        fail_range_only: bool,
        tip_height: u64,
    }

    #[async_trait]
    impl BlockSource for BrokenChain {
        async fn block_by_hash(&self, _hash: &str) -> Result<RawBlock, RpcError> {
            if self.fail_range_only {
                Ok(RawBlock { header: header(self.tip_height), tx_hashes: vec![] })
            } else {
                Err(RpcError::Http("connection refused".into()))
            }
        }

        async fn headers_in_range(&self, _start: u64, _end: u64) -> Result<Vec<BlockHeader>, RpcError> {
            Err(RpcError::Timeout { ms: 10_000 })
        }
    }

    fn resolved(resolution: Resolution<Block>) -> Block {
        match resolution {
            Resolution::Resolved(block) => block,
            other => panic!("expected resolved block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn genesis_needs_one_call_and_no_ancestors() {
        let source = StubChain::new(0);
        let cfg = ResolverConfig { ignore_below_height: 0, max_ancestors: 10 };

        let block = resolved(resolve_block("hash0", &cfg, &source).await.unwrap());
        assert!(block.ancestors.is_empty());
        assert_eq!(source.block_calls.load(Ordering::Relaxed), 1);
        assert_eq!(source.range_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn zero_max_ancestors_skips_range_call() {
        let source = StubChain::new(500);
        let cfg = ResolverConfig { ignore_below_height: 0, max_ancestors: 0 };

        let block = resolved(resolve_block("hash500", &cfg, &source).await.unwrap());
        assert!(block.ancestors.is_empty());
        assert_eq!(source.range_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn window_is_clamped_and_nearest_first() {
        let source = StubChain::new(5);
        let cfg = ResolverConfig { ignore_below_height: 0, max_ancestors: 2 };

        let block = resolved(resolve_block("hash5", &cfg, &source).await.unwrap());
        assert_eq!(block.ancestors, vec!["hash4".to_string(), "hash3".to_string()]);
        assert_eq!(*source.last_range.lock().unwrap(), Some((3, 4)));
        assert_eq!(source.range_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn oversized_window_clamps_to_genesis() {
        let source = StubChain::new(3);
        let cfg = ResolverConfig { ignore_below_height: 0, max_ancestors: 100 };

        let block = resolved(resolve_block("hash3", &cfg, &source).await.unwrap());
        assert_eq!(*source.last_range.lock().unwrap(), Some((0, 2)));
        assert_eq!(
            block.ancestors,
            vec!["hash2".to_string(), "hash1".to_string(), "hash0".to_string()]
        );
    }

    #[tokio::test]
    async fn daemon_order_is_not_assumed() {
        let ascending = StubChain::new(5);
        let descending = StubChain::new(5).descending();
        let cfg = ResolverConfig { ignore_below_height: 0, max_ancestors: 2 };

        let a = resolved(resolve_block("hash5", &cfg, &ascending).await.unwrap());
        let b = resolved(resolve_block("hash5", &cfg, &descending).await.unwrap());
        assert_eq!(a.ancestors, b.ancestors);
    }

    #[tokio::test]
    async fn below_floor_skips_before_range_call() {
        let source = StubChain::new(4);
        let cfg = ResolverConfig { ignore_below_height: 10, max_ancestors: 3 };

        let resolution = resolve_block("hash4", &cfg, &source).await.unwrap();
        assert_eq!(resolution, Resolution::Skipped { height: 4, floor: 10 });
        assert_eq!(source.block_calls.load(Ordering::Relaxed), 1);
        assert_eq!(source.range_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn at_floor_resolves() {
        let source = StubChain::new(10);
        let cfg = ResolverConfig { ignore_below_height: 10, max_ancestors: 0 };
        assert!(!resolve_block("hash10", &cfg, &source).await.unwrap().is_skipped());
    }

    #[tokio::test]
    async fn block_fetch_error_propagates() {
        let cfg = ResolverConfig::default();
        let source = BrokenChain { fail_range_only: false, tip_height: 5 };
        let err = resolve_block("hash5", &cfg, &source).await.unwrap_err();
        assert!(matches!(err, PipelineError::Rpc(RpcError::Http(_))));
    }

    #[tokio::test]
    async fn range_fetch_error_propagates() {
        let cfg = ResolverConfig { ignore_below_height: 0, max_ancestors: 2 };
        let source = BrokenChain { fail_range_only: true, tip_height: 5 };
        let err = resolve_block("hash5", &cfg, &source).await.unwrap_err();
        assert!(matches!(err, PipelineError::Rpc(RpcError::Timeout { .. })));
    }

    #[tokio::test]
    async fn short_range_response_is_accepted() {
        struct ShortChain;

        #[async_trait]
        impl BlockSource for ShortChain {
            async fn block_by_hash(&self, _hash: &str) -> Result<RawBlock, RpcError> {
                Ok(RawBlock { header: header(5), tx_hashes: vec![] })
            }

            async fn headers_in_range(&self, _start: u64, end: u64) -> Result<Vec<BlockHeader>, RpcError> {
                // Only the nearest header survives pruning.
                Ok(vec![header(end)])
            }
        }

        let cfg = ResolverConfig { ignore_below_height: 0, max_ancestors: 3 };
        let block = resolved(resolve_block("hash5", &cfg, &ShortChain).await.unwrap());
        assert_eq!(block.ancestors, vec!["hash4".to_string()]);
    }
}
