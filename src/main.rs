use std::sync::Arc;

use anyhow::{Context, Result};
use casebook::transport::LoopbackFactory;
use casebook::{create_router, AppState, Config};
use clap::Parser;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "casebook", about = "Spoken-interview engine for case studies")]
struct Args {
    /// Configuration file (without extension), loaded via the config crate
    #[arg(long, default_value = "config/casebook")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config))?;

    info!("{} starting", cfg.service.name);
    info!("Realtime endpoint: {}", cfg.realtime.endpoint);
    info!("Backend: {}", cfg.backend.base_url);

    // No platform media stack is embedded in the service binary; sessions
    // run against loopback endpoints until one is wired in.
    warn!("Using loopback media endpoints");
    let media = Arc::new(LoopbackFactory::new());

    let state = AppState::new(cfg.clone(), media);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
