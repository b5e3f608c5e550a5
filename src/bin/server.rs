//! blockfs Server Binary
//!
//! Opens (or initializes) the backing store and serves the line protocol.

use std::sync::Arc;

use blockfs::network::Server;
use blockfs::{Config, Engine};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// blockfs Server
#[derive(Parser, Debug)]
#[command(name = "blockfs-server")]
#[command(about = "Miniature networked filesystem over a flat block store")]
#[command(version)]
struct Args {
    /// Backing-store file ("virtual disk")
    #[arg(short, long, default_value = "./blockfs.img")]
    disk: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    listen: String,

    /// Directory capacity (maximum number of files)
    #[arg(long, default_value = "16")]
    max_files: usize,

    /// Data-region capacity in 128-byte blocks
    #[arg(long, default_value = "256")]
    max_blocks: usize,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "64")]
    max_connections: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blockfs=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("blockfs Server v{}", blockfs::VERSION);
    tracing::info!("Backing store: {}", args.disk);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .disk_path(&args.disk)
        .listen_addr(&args.listen)
        .max_files(args.max_files)
        .max_blocks(args.max_blocks)
        .max_connections(args.max_connections)
        .build();

    // Open engine
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized successfully");

    // Start server
    let mut server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind listener: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
