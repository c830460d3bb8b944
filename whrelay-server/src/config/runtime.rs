//! Validated runtime configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Server configuration with runtime values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
}

/// Upstream chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Base URL, `http` or `https` with a host.
    pub url: Url,
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// The base URL without a trailing slash, as shown to users.
    pub fn base(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Full upstream URL for an incoming request's path and query.
    pub fn target(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base(), path_and_query)
    }
}

/// Template selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagesConfig {
    pub style: String,
    pub directory: PathBuf,
}
