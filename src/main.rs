//! migratord — inbound live-migration handoff daemon.
//!
//! A trusted peer process forwards live client connections here by
//! passing their file descriptors over a local socket, each accompanied
//! by a JSON envelope describing the request. Connections whose path
//! belongs to the memory-migration service are handed to the transfer
//! engine; everything else is answered with an HTTP 404 and closed.
//!
//! See the library crate root for the full architecture.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use migratord::config::loader::load_config;
use migratord::migration::NullReceiver;
use migratord::rpc::LoggingDispatcher;
use migratord::{Daemon, DaemonConfig};

#[derive(Parser)]
#[command(name = "migratord")]
#[command(about = "Inbound live-migration handoff daemon", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DaemonConfig::default(),
    };

    migratord::observability::logging::init(&config.observability.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "migratord starting");
    tracing::info!(
        rpc_socket = %config.sockets.rpc_path().display(),
        forwarded_socket = %config.sockets.forwarded_path().display(),
        pool_size = config.workers.pool_size,
        "Configuration loaded"
    );

    let daemon = Daemon::new(config, Arc::new(NullReceiver), Arc::new(LoggingDispatcher));
    daemon.serve().await?;
    Ok(())
}
