//! Configuration module for whrelay-server.
//!
//! Handles loading configuration from the TOML file and applying CLI
//! overrides. A missing file is not an error: every setting has a default.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{MessagesConfig, ServerConfig, UpstreamConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;
use whrelay_core::templates::is_valid_style;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<SocketAddr>,
    pub style: Option<String>,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub messages: MessagesConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, falling back to defaults when it does not exist
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = ?self.config_path,
                    "Config file not found, using default settings"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(listen) = self.overrides.listen {
            file_config.server.listen = listen;
        }
        if let Some(style) = &self.overrides.style {
            file_config.messages.style = style.clone();
        }

        self.build_loaded_config(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn build_loaded_config(&self, file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        let url = Url::parse(&file_config.upstream.url)?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "upstream url {url} must be http(s) with a host"
            )));
        }
        if file_config.upstream.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "upstream timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !is_valid_style(&file_config.messages.style) {
            return Err(ConfigError::ValidationError(format!(
                "style {:?} must be a single directory name",
                file_config.messages.style
            )));
        }

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
            },
            upstream: UpstreamConfig {
                url,
                timeout: Duration::from_secs(file_config.upstream.timeout_secs),
            },
            messages: MessagesConfig {
                style: file_config.messages.style,
                directory: file_config.messages.directory,
            },
        })
    }
}
