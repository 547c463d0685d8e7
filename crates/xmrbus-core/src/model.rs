//! Canonical entities published to the bus.

use serde::{Deserialize, Serialize};

use xmrbus_rpc::{BlockHeader, RawBlock, TransferRecord};

// ─── Transaction ─────────────────────────────────────────────────────────────

/// One output of a transaction: who received how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub amount: i64,
    pub address: String,
}

/// The canonical incoming view of a wallet transaction.
///
/// Valid only with a non-empty `txid` and at least one destination, which
/// [`Transaction::from_transfers`] enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub txid: String,
    pub destinations: Vec<Destination>,
    pub height: u64,
    pub timestamp: u64,
    pub unlock_time: u64,
    pub confirmations: u64,
}

impl Transaction {
    /// Reduce a wallet transfer list to the canonical transaction.
    ///
    /// Keeps exactly the incoming records (`in`/`pool`) in their RPC return
    /// order; `out` and unknown tags are discarded. Scalar fields come from
    /// the first incoming record. Returns `None` when the filtered set is
    /// empty or carries no usable txid.
    pub fn from_transfers(records: &[TransferRecord]) -> Option<Self> {
        let incoming: Vec<&TransferRecord> = records.iter().filter(|r| r.is_incoming()).collect();
        let first = *incoming.first()?;
        if first.txid.is_empty() {
            return None;
        }

        let destinations = incoming
            .iter()
            .map(|r| Destination {
                amount: r.amount,
                address: r.address.clone(),
            })
            .collect();

        Some(Self {
            txid: first.txid.clone(),
            destinations,
            height: first.height,
            timestamp: first.timestamp,
            unlock_time: first.unlock_time,
            confirmations: first.confirmations,
        })
    }
}

// ─── Block ───────────────────────────────────────────────────────────────────

/// The canonical view of a block: the target header plus the hashes of its
/// nearest ancestors and contained transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    pub height: u64,
    pub timestamp: u64,
    /// Ancestor hashes, nearest-first. Empty for genesis.
    pub ancestors: Vec<String>,
    pub tx_hashes: Vec<String>,
}

impl Block {
    /// Assemble from the target fetch plus the (possibly empty) ancestor
    /// header range.
    ///
    /// The daemon's native range order is not assumed: headers are sorted by
    /// descending height here, so the ancestor sequence always reads
    /// nearest-first.
    pub fn from_parts(raw: RawBlock, mut ancestor_headers: Vec<BlockHeader>) -> Self {
        ancestor_headers.sort_by(|a, b| b.height.cmp(&a.height));
        Self {
            hash: raw.header.hash,
            height: raw.header.height,
            timestamp: raw.header.timestamp,
            ancestors: ancestor_headers.into_iter().map(|h| h.hash).collect(),
            tx_hashes: raw.tx_hashes,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
