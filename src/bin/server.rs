//! SnapKV Server Binary
//!
//! Starts the HTTP server for SnapKV.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use snapkv::http::create_router;
use snapkv::{Config, PersistMode, Scheduler, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// SnapKV Server
#[derive(Parser, Debug)]
#[command(name = "snapkv-server")]
#[command(about = "In-process key-value store over HTTP with JSON snapshot persistence")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Path of the JSON snapshot file
    #[arg(short, long, default_value = "data.json")]
    save_path: String,

    /// Minimum seconds between snapshot writes
    #[arg(short = 'i', long, default_value = "10")]
    save_interval_secs: u64,

    /// When snapshots are triggered
    #[arg(short = 'm', long, value_enum, default_value = "threshold")]
    persist_mode: ModeArg,

    /// Respond 404 to DELETE of an absent key
    #[arg(long)]
    strict_delete: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Write a snapshot after a mutation once the interval elapsed
    Threshold,
    /// Write snapshots from a background timer task
    Timer,
}

impl From<ModeArg> for PersistMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Threshold => PersistMode::ThresholdOnWrite,
            ModeArg::Timer => PersistMode::BackgroundTimer,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,snapkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("SnapKV Server v{}", snapkv::VERSION);
    tracing::info!("Snapshot path: {}", args.save_path);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .save_path(&args.save_path)
        .save_interval(Duration::from_secs(args.save_interval_secs))
        .persist_mode(args.persist_mode.into())
        .listen_addr(&args.listen)
        .strict_delete(args.strict_delete)
        .build();

    // Open the store. A malformed snapshot file is fatal: the process
    // must not start silently with corrupted state.
    let store = match Store::open(config.clone()) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    // Timer mode runs one background persistence task
    let scheduler = match config.persist_mode {
        PersistMode::BackgroundTimer => Some(Scheduler::spawn(Arc::clone(&store))),
        PersistMode::ThresholdOnWrite => None,
    };

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Serving on http://{}", config.listen_addr);

    let app = create_router(Arc::clone(&store));
    let serve = axum::serve(listener, app).with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Received Ctrl+C, shutting down");
    });

    if let Err(e) = serve.await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // Stop the persistence task (flushes a final snapshot); in threshold
    // mode flush directly so a graceful stop loses nothing either way.
    match scheduler {
        Some(scheduler) => scheduler.shutdown().await,
        None => {
            if let Err(e) = store.persist() {
                tracing::warn!("final snapshot write failed: {}", e);
            }
        }
    }

    tracing::info!("Server stopped");
}
