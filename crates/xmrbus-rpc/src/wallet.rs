//! Wallet RPC bindings — transfer lookup by transaction id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::HttpRpcClient;
use crate::error::RpcError;

/// One transfer reported by the wallet for a transaction id, as returned by
/// `get_transfer_by_txid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub txid: String,
    pub address: String,
    /// Signed amount in atomic units.
    pub amount: i64,
    #[serde(default)]
    pub confirmations: u64,
    /// Block height; 0 while the transfer sits in the pool.
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub unlock_time: u64,
    /// Type tag: `in`, `pool`, `out`, ...
    #[serde(rename = "type")]
    pub transfer_type: String,
}

impl TransferRecord {
    /// Returns `true` if this transfer moves funds *into* the wallet
    /// (confirmed or still in the pool).
    pub fn is_incoming(&self) -> bool {
        matches!(self.transfer_type.as_str(), "in" | "pool")
    }
}

#[derive(Debug, Clone, Serialize)]
struct GetTransferByTxidParams {
    txid: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GetTransferByTxidResult {
    #[serde(default)]
    transfers: Vec<TransferRecord>,
}

/// The wallet-side gateway trait the transaction resolver is written against.
#[async_trait]
pub trait TransferSource: Send + Sync {
    /// Fetch all transfer records the wallet knows for `txid`.
    async fn transfers_by_txid(&self, txid: &str) -> Result<Vec<TransferRecord>, RpcError>;
}

/// Typed wallet RPC client.
pub struct WalletRpc {
    client: HttpRpcClient,
}

impl WalletRpc {
    pub fn new(client: HttpRpcClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransferSource for WalletRpc {
    async fn transfers_by_txid(&self, txid: &str) -> Result<Vec<TransferRecord>, RpcError> {
        let result: GetTransferByTxidResult = self
            .client
            .call(
                "get_transfer_by_txid",
                GetTransferByTxidParams {
                    txid: txid.to_owned(),
                },
            )
            .await?;
        tracing::debug!(txid, transfers = result.transfers.len(), "fetched transfers");
        Ok(result.transfers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_tags() {
        let mut record = TransferRecord {
            txid: "t".into(),
            address: "a".into(),
            amount: 1,
            confirmations: 0,
            height: 0,
            timestamp: 0,
            unlock_time: 0,
            transfer_type: "in".into(),
        };
        assert!(record.is_incoming());

        record.transfer_type = "pool".into();
        assert!(record.is_incoming());

        record.transfer_type = "out".into();
        assert!(!record.is_incoming());

        record.transfer_type = "pending".into();
        assert!(!record.is_incoming());
    }

    #[test]
    fn transfers_result_decodes() {
        let json = r#"{
            "transfers": [
                {
                    "txid": "c3b9…",
                    "address": "55LT…",
                    "amount": 300000000000,
                    "confirmations": 1,
                    "height": 153624,
                    "timestamp": 1535918400,
                    "unlock_time": 0,
                    "type": "in"
                }
            ]
        }"#;
        let result: GetTransferByTxidResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.transfers.len(), 1);
        assert_eq!(result.transfers[0].height, 153624);
        assert!(result.transfers[0].is_incoming());
    }

    #[test]
    fn transfers_result_defaults_to_empty() {
        let result: GetTransferByTxidResult = serde_json::from_str("{}").unwrap();
        assert!(result.transfers.is_empty());
    }
}
