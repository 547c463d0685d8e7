//! xmrbus-core — the enrichment pipeline between the Monero RPC servers and
//! the event bus.
//!
//! # Architecture
//!
//! ```text
//! CLI ──▶ resolve_transaction ─┐
//!                              ├──▶ height floor ──▶ EventSink ──▶ BusPublisher
//! CLI ──▶ resolve_block ───────┘        │
//!                                       └──▶ Skipped (no publish)
//! ```
//!
//! One entity is resolved and published per invocation. Each value is owned
//! exclusively from construction to publish-or-discard; nothing is cached or
//! shared across invocations.

pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod resolver;

pub use config::ResolverConfig;
pub use error::PipelineError;
pub use event::{Envelope, EventKind, EVENT_CHANNEL, EVENT_VERSION};
pub use model::{Block, Destination, Transaction};
pub use pipeline::{process_block_hash, process_txid, Outcome};
pub use publish::{BusPublisher, EventSink, PublishError};
pub use resolver::{resolve_block, resolve_transaction, Resolution};
