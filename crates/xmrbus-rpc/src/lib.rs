//! xmrbus-rpc — JSON-RPC gateway to the Monero wallet and daemon RPC servers.
//!
//! This crate defines:
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] — JSON-RPC 2.0 wire types
//! - [`RpcError`] — structured transport/protocol error type
//! - [`HttpRpcClient`] — reqwest-backed HTTP client posting to `<host>/json_rpc`
//! - [`WalletRpc`] / [`DaemonRpc`] — typed bindings for the methods the
//!   enrichment pipeline consumes
//! - [`TransferSource`] / [`BlockSource`] — the gateway traits the resolvers
//!   are written against

pub mod client;
pub mod daemon;
pub mod error;
pub mod request;
pub mod wallet;

pub use client::{HttpClientConfig, HttpRpcClient};
pub use daemon::{BlockHeader, BlockSource, DaemonRpc, RawBlock};
pub use error::RpcError;
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use wallet::{TransferRecord, TransferSource, WalletRpc};
