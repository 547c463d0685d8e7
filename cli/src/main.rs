//! xmrbus CLI — gather extra context about a Monero transaction or block and
//! publish it through NATS.
//!
//! # Commands
//! ```
//! xmrbus transaction <txid>       [--wallet-rpc-url <url>]
//! xmrbus block       <blockHash>  [--daemon-rpc-url <url>] [--max-ancestors <n>]
//! xmrbus ping
//! ```
//!
//! Global flags: `--nats-url`, `--ignore-below-height`.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xmrbus_core::{
    process_block_hash, process_txid, BusPublisher, EventSink, Outcome, ResolverConfig,
};
use xmrbus_nats::NatsPublisher;
use xmrbus_rpc::{DaemonRpc, HttpRpcClient, WalletRpc};

#[derive(Parser)]
#[command(
    name = "xmrbus",
    about = "Bridge Monero RPC entities to NATS events",
    version
)]
struct Cli {
    /// URL of the NATS server events are published to
    #[arg(long, global = true, default_value = "nats://localhost:4222")]
    nats_url: String,

    /// Skip entities below this chain height instead of publishing them
    #[arg(long, global = true, default_value_t = 0)]
    ignore_below_height: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a wallet transaction as a transaction.created event
    #[command(alias = "tx")]
    Transaction {
        /// Transaction id to resolve
        txid: String,
        /// URL of the Monero wallet RPC server
        #[arg(long, default_value = "http://localhost:38083")]
        wallet_rpc_url: String,
    },

    /// Publish a block as a block.created event
    #[command(alias = "blk")]
    Block {
        /// Block hash to resolve
        block_hash: String,
        /// URL of the Monero daemon RPC server
        #[arg(long, default_value = "http://localhost:38081")]
        daemon_rpc_url: String,
        /// How many ancestor headers to include (0 = none)
        #[arg(long, default_value_t = 0)]
        max_ancestors: u64,
    },

    /// Check connectivity to the NATS server
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let sink = EventSink::new(NatsPublisher::new(&cli.nats_url));

    match cli.command {
        Commands::Transaction { txid, wallet_rpc_url } => {
            let cfg = ResolverConfig {
                ignore_below_height: cli.ignore_below_height,
                max_ancestors: 0,
            };
            let wallet = WalletRpc::new(HttpRpcClient::default_for(wallet_rpc_url));
            report(process_txid(&txid, &cfg, &wallet, &sink).await?);
        }

        Commands::Block { block_hash, daemon_rpc_url, max_ancestors } => {
            let cfg = ResolverConfig {
                ignore_below_height: cli.ignore_below_height,
                max_ancestors,
            };
            let daemon = DaemonRpc::new(HttpRpcClient::default_for(daemon_rpc_url));
            report(process_block_hash(&block_hash, &cfg, &daemon, &sink).await?);
        }

        Commands::Ping => {
            let publisher = NatsPublisher::new(&cli.nats_url);
            if !publisher.is_ready().await {
                bail!("NATS server at {} is not reachable", cli.nats_url);
            }
            println!("NATS server at {} is reachable", cli.nats_url);
        }
    }

    Ok(())
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Published => tracing::info!("event published"),
        Outcome::Skipped => tracing::info!("entity below height floor, nothing published"),
    }
}
