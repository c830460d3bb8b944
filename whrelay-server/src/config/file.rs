//! TOML file configuration structures.
//!
//! These structs directly map to the `whrelay.toml` file format. Every
//! section and field is optional.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8082").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8082))
}

/// Where rewritten webhooks are forwarded to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the chat platform. The request path and query are appended.
    #[serde(default = "default_upstream_url")]
    pub url: String,
    /// Timeout for one forwarded request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_upstream_url() -> String {
    "https://discord.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Message template selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    /// Name of the style directory under `directory`.
    #[serde(default = "default_style")]
    pub style: String,
    /// Root directory holding one sub-directory per style.
    #[serde(default = "default_messages_dir")]
    pub directory: PathBuf,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            style: default_style(),
            directory: default_messages_dir(),
        }
    }
}

fn default_style() -> String {
    "simple".to_string()
}

fn default_messages_dir() -> PathBuf {
    PathBuf::from("messages")
}
