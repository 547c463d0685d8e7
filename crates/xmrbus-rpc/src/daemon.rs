//! Daemon RPC bindings — block lookup by hash and batched header ranges.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::HttpRpcClient;
use crate::error::RpcError;

/// A block header as returned by `get_block` and `get_block_headers_range`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockHeader {
    pub hash: String,
    pub height: u64,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub prev_hash: String,
}

/// The raw `get_block` result: the target header plus the hashes of the
/// transactions the block contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(rename = "block_header")]
    pub header: BlockHeader,
    #[serde(default)]
    pub tx_hashes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct GetBlockParams {
    hash: String,
}

#[derive(Debug, Clone, Serialize)]
struct GetBlockHeadersRangeParams {
    start_height: u64,
    end_height: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct GetBlockHeadersRangeResult {
    #[serde(default)]
    headers: Vec<BlockHeader>,
}

/// The daemon-side gateway trait the block resolver is written against.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Fetch a block by hash.
    async fn block_by_hash(&self, hash: &str) -> Result<RawBlock, RpcError>;

    /// Fetch the contiguous header range `[start, end]` in one batched call.
    ///
    /// The returned order is the daemon's own; callers must not rely on it.
    async fn headers_in_range(&self, start: u64, end: u64) -> Result<Vec<BlockHeader>, RpcError>;
}

/// Typed daemon RPC client.
pub struct DaemonRpc {
    client: HttpRpcClient,
}

impl DaemonRpc {
    pub fn new(client: HttpRpcClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlockSource for DaemonRpc {
    async fn block_by_hash(&self, hash: &str) -> Result<RawBlock, RpcError> {
        let block: RawBlock = self
            .client
            .call("get_block", GetBlockParams { hash: hash.to_owned() })
            .await?;
        tracing::debug!(
            hash,
            height = block.header.height,
            txs = block.tx_hashes.len(),
            "fetched block"
        );
        Ok(block)
    }

    async fn headers_in_range(&self, start: u64, end: u64) -> Result<Vec<BlockHeader>, RpcError> {
        let result: GetBlockHeadersRangeResult = self
            .client
            .call(
                "get_block_headers_range",
                GetBlockHeadersRangeParams {
                    start_height: start,
                    end_height: end,
                },
            )
            .await?;
        tracing::debug!(start, end, headers = result.headers.len(), "fetched header range");
        Ok(result.headers)
    }
}
