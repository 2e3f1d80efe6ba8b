//! Configuration management for the circular fetcher
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Command-line flags are applied last by the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{ClientConfig, DownloaderConfig, SourceConfig};
use crate::constants::{cbn, download, env, files, http, logging, selectors};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listing source settings
    pub source: SourceConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Download phase settings
    pub download: DownloadConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly listing source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfigToml {
    /// Structured listing endpoint
    pub api_url: String,
    /// Rendered listing page, also sent as `Referer`
    pub listing_url: String,
    /// Origin for relative document links
    pub base_url: String,
    /// Row selector for the listing page grid
    pub row_selector: String,
    /// Saved listing page used as a last resort
    pub snapshot_path: Option<PathBuf>,
    /// Id of the element wrapping the snapshot table
    pub snapshot_container_id: String,
    /// Where to dump an undecodable API response
    pub debug_dump_dir: Option<PathBuf>,
}

impl Default for SourceConfigToml {
    fn default() -> Self {
        Self {
            api_url: cbn::API_URL.to_string(),
            listing_url: cbn::LISTING_URL.to_string(),
            base_url: cbn::BASE_URL.to_string(),
            row_selector: selectors::LISTING_ROW_SELECTOR.to_string(),
            snapshot_path: None,
            snapshot_container_id: selectors::SNAPSHOT_CONTAINER_ID.to_string(),
            debug_dump_dir: None,
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// User agent sent with every request
    pub user_agent: String,
    /// Listing request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Follow redirects
    pub follow_redirects: bool,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            follow_redirects: true,
            max_redirects: http::MAX_REDIRECTS,
            accept_invalid_certs: true,
        }
    }
}

/// TOML-friendly download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfigToml {
    /// Manifest file shared by both phases
    pub manifest_path: PathBuf,
    /// Directory receiving the documents
    pub output_dir: PathBuf,
    /// Per-document timeout in seconds
    pub download_timeout_secs: u64,
    /// Pause after each network request in milliseconds
    pub request_delay_ms: u64,
    /// Records between manifest checkpoints
    pub checkpoint_interval: usize,
}

impl Default for DownloadConfigToml {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(files::MANIFEST_FILE_NAME),
            output_dir: PathBuf::from(files::OUTPUT_DIR),
            download_timeout_secs: http::DOWNLOAD_TIMEOUT.as_secs(),
            request_delay_ms: download::REQUEST_DELAY.as_millis() as u64,
            checkpoint_interval: download::CHECKPOINT_INTERVAL,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unparseable source URLs, zero
    /// timeouts or a zero checkpoint interval.
    pub fn to_runtime_config(&self) -> ConfigResult<(SourceConfig, ClientConfig, DownloaderConfig)> {
        Ok((
            self.source.to_runtime_config(&self.download.output_dir)?,
            self.client.to_runtime_config()?,
            self.download.to_runtime_config(&self.source.listing_url)?,
        ))
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        if let Some(path) = config_path {
            config = Self::load_from_file(&path).await?;
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(env::MANIFEST_PATH).filter(|v| !v.is_empty()) {
            debug!("{} overrides manifest path: {}", env::MANIFEST_PATH, path);
            self.download.manifest_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(env::OUTPUT_DIR).filter(|v| !v.is_empty()) {
            debug!("{} overrides output directory: {}", env::OUTPUT_DIR, dir);
            self.download.output_dir = PathBuf::from(dir);
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![
            PathBuf::from("./circular-fetcher.toml"),
            PathBuf::from("./config.toml"),
        ];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("circular-fetcher").join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|source| ConfigError::InvalidFormat {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}

impl SourceConfigToml {
    /// Convert to runtime SourceConfig
    pub fn to_runtime_config(&self, output_dir: &Path) -> ConfigResult<SourceConfig> {
        absolute_url("source.api_url", &self.api_url)?;
        absolute_url("source.listing_url", &self.listing_url)?;
        absolute_url("source.base_url", &self.base_url)?;

        Ok(SourceConfig {
            api_url: self.api_url.clone(),
            listing_url: self.listing_url.clone(),
            base_url: self.base_url.clone(),
            row_selector: self.row_selector.clone(),
            snapshot_path: self.snapshot_path.clone(),
            snapshot_container_id: self.snapshot_container_id.clone(),
            debug_dump_dir: self.debug_dump_dir.clone(),
            output_dir: output_dir.to_path_buf(),
        })
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ConfigResult<ClientConfig> {
        Ok(ClientConfig {
            user_agent: self.user_agent.clone(),
            request_timeout: non_zero_secs("client.request_timeout_secs", self.request_timeout_secs)?,
            connect_timeout: non_zero_secs("client.connect_timeout_secs", self.connect_timeout_secs)?,
            follow_redirects: self.follow_redirects,
            max_redirects: self.max_redirects,
            accept_invalid_certs: self.accept_invalid_certs,
        })
    }
}

impl DownloadConfigToml {
    /// Convert to runtime DownloaderConfig
    pub fn to_runtime_config(&self, referer: &str) -> ConfigResult<DownloaderConfig> {
        if self.checkpoint_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "download.checkpoint_interval".to_string(),
                value: "0".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        Ok(DownloaderConfig {
            output_dir: self.output_dir.clone(),
            referer: referer.to_string(),
            download_timeout: non_zero_secs(
                "download.download_timeout_secs",
                self.download_timeout_secs,
            )?,
            request_delay: Duration::from_millis(self.request_delay_ms),
            checkpoint_interval: self.checkpoint_interval,
        })
    }
}

fn absolute_url(field: &str, value: &str) -> ConfigResult<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn non_zero_secs(field: &str, secs: u64) -> ConfigResult<Duration> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: secs.to_string(),
            reason: "Timeouts must be positive".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
