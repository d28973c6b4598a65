//! musify-artist - Artist aggregation microservice
//!
//! Serves `GET /musify/music-artist/details/:mbid`, combining MusicBrainz,
//! Wikidata, Wikipedia and Cover Art Archive data into one artist record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use musify_artist::config::ServiceConfig;
use musify_artist::services::ArtistAggregator;
use musify_artist::{build_router, AppState};
use musify_common::config::{default_config_path, load_toml_config, TomlConfig};

/// Command-line arguments for musify-artist
#[derive(Parser, Debug)]
#[command(name = "musify-artist")]
#[command(about = "Artist aggregation microservice for Musify")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "MUSIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding server.bind_addr
    #[arg(short, long, env = "MUSIFY_BIND_ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path("musify-artist"));
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path).context("Failed to load configuration")?,
        None => TomlConfig::default(),
    };

    // RUST_LOG takes precedence over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Musify Artist (musify-artist) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        Some(path) => warn!("Config file {} not found, using defaults", path.display()),
        None => warn!("No config directory available, using defaults"),
    }

    let config = ServiceConfig::resolve(&toml_config).context("Invalid configuration")?;
    let bind_addr = args.bind.unwrap_or_else(|| config.bind_addr.clone());

    for (name, settings) in [
        ("MusicBrainz", &config.musicbrainz),
        ("Wikidata", &config.wikidata),
        ("Wikipedia", &config.wikipedia),
        ("Cover Art Archive", &config.cover_art),
    ] {
        info!(
            "{}: {} (cache ttl {:?}, max {} entries)",
            name, settings.base_url, settings.cache.ttl, settings.cache.max_entries
        );
    }

    let aggregator =
        ArtistAggregator::from_config(&config).context("Failed to build upstream clients")?;
    let app = build_router(AppState::new(aggregator));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
