//! Signal handling for graceful shutdown and config reload.

use crate::config::ConfigLoader;
use crate::config::runtime::ServerConfig;
use crate::state::{AppState, build_pipeline};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C).
pub async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

/// Spawns a task that listens for SIGHUP and reloads the configuration.
///
/// Only the `[messages]` section takes effect on reload; the listen address
/// and upstream are bound at startup. A reload that fails validation, or
/// whose style is missing templates, leaves the running pipeline untouched.
///
/// Returns a Notify that can be used to signal when shutdown is complete.
pub fn spawn_config_reload_handler(
    state: AppState,
    config_loader: Arc<ConfigLoader>,
    server: ServerConfig,
) -> Arc<Notify> {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, reloading configuration");
                    reload(&state, &config_loader, &server).await;
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Config reload handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}

async fn reload(state: &AppState, config_loader: &ConfigLoader, server: &ServerConfig) {
    let loaded_config = match config_loader.reload() {
        Ok(loaded_config) => loaded_config,
        Err(e) => {
            tracing::error!("Failed to reload configuration: {}", e);
            return;
        }
    };

    if loaded_config.server != *server {
        tracing::warn!(
            listen = %loaded_config.server.listen,
            "Listen address changed; restart to apply"
        );
    }
    if loaded_config.upstream != *state.upstream {
        tracing::warn!(
            upstream = %loaded_config.upstream.base(),
            "Upstream changed; restart to apply"
        );
    }

    match build_pipeline(&loaded_config.messages) {
        Ok(pipeline) => {
            state.replace_pipeline(pipeline).await;
            tracing::info!(
                style = %loaded_config.messages.style,
                "Configuration reloaded successfully"
            );
        }
        Err(e) => {
            tracing::error!(
                style = %loaded_config.messages.style,
                error = %e,
                "Failed to load message templates, keeping previous style"
            );
        }
    }
}
