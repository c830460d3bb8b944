//! whrelay server
//!
//! A reverse proxy that sits between a trading bot and Discord, rewriting
//! the bot's webhook notifications into a configurable message style.

mod config;
mod proxy;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, ConfigOverrides};
use server::{build_router, run_server};
use shutdown::{shutdown_signal, spawn_config_reload_handler};
use state::{AppState, build_pipeline};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// whrelay - restyle trading bot webhooks on their way to Discord
#[derive(Parser, Debug)]
#[command(name = "whrelay-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "WHRELAY_CONFIG", default_value = "./whrelay.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:8082)
    #[arg(short, long, env = "WHRELAY_LISTEN")]
    listen: Option<SocketAddr>,

    /// Override the message style (a directory under the messages root)
    #[arg(short, long, env = "WHRELAY_STYLE")]
    style: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting whrelay-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(
        &args.config,
        ConfigOverrides {
            listen: args.listen,
            style: args.style,
        },
    ));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", config_loader.config_path());

    // Every template of the style must be present before serving
    let pipeline = build_pipeline(&loaded_config.messages).map_err(|e| {
        tracing::error!(
            style = %loaded_config.messages.style,
            directory = ?loaded_config.messages.directory,
            "Failed to load message templates: {}",
            e
        );
        e
    })?;
    tracing::info!(style = %pipeline.style(), "Message templates loaded");

    let http_client = reqwest::Client::builder()
        .timeout(loaded_config.upstream.timeout)
        .build()?;

    let listen_addr = loaded_config.server.listen;
    let upstream_base = loaded_config.upstream.base().to_string();

    // Create application state
    let state = AppState::new(pipeline, loaded_config.upstream, http_client);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify =
        spawn_config_reload_handler(state.clone(), config_loader, loaded_config.server);

    tracing::info!(
        "Replace \"{}\" with \"http://localhost:{}\" in the bot's webhook settings",
        upstream_base,
        listen_addr.port()
    );

    // Build the router
    let router = build_router(state.clone());

    // Run the server until a signal arrives or a template goes missing
    let halted = state.halted();
    let result = run_server(router, listen_addr, async move {
        tokio::select! {
            _ = shutdown_signal() => {}
            _ = halted => {
                tracing::error!("Message template unavailable, shutting down");
            }
        }
    })
    .await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();

    result?;
    if state.is_halted() {
        anyhow::bail!("stopped after a message template could not be loaded");
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,whrelay_server=info,whrelay_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
