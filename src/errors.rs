//! Error types for Circular Fetcher
//!
//! Errors are grouped by the component that raises them. Every top-level
//! [`AppError`] reports one of the pipeline's failure categories
//! (transport, protocol, content, manifest, persistence, config) through
//! [`AppError::category`], which the CLI uses for its final message.

use std::path::PathBuf;
use thiserror::Error;

/// Transport-level failures raised by the HTTP fetcher
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network failure, timeout or TLS failure
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Invalid header value supplied in a request profile
    #[error("Invalid header value for {name}: {value}")]
    InvalidHeader { name: String, value: String },
}

impl FetchError {
    /// Whether the failure was a timeout rather than a refused or broken connection
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Transport { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

/// Listing extraction errors
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Listing request failed at the transport level
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Listing endpoint answered with a non-200 status
    #[error("Listing request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Structured listing response could not be decoded
    #[error("Listing response is not a valid circular array: {0}")]
    Decode(#[from] serde_json::Error),

    /// CSS selector error
    #[error("Invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },

    /// Every extraction path came back empty
    #[error("No circulars found in the listing")]
    NoCirculars,
}

/// Manifest loading and persistence errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("Manifest file not found: {path}. Run 'extract' first")]
    NotFound { path: PathBuf },

    /// JSON parsing or serialization error
    #[error("Manifest JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// I/O error reading the manifest
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error writing the manifest
    #[error("Failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Download phase errors that abort the whole run
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Output directory could not be created
    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The final manifest save failed; the run's results were not persisted
    #[error("Final manifest save failed: {0}")]
    FinalSave(#[source] ManifestError),

    /// HTTP client setup failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format in {path}: {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Extraction error
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Manifest error
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get the failure category for logging and exit reporting
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(FetchError::Transport { .. })
            | AppError::Extract(ExtractError::Fetch(FetchError::Transport { .. }))
            | AppError::Download(DownloadError::Fetch(FetchError::Transport { .. })) => {
                "transport"
            }

            AppError::Extract(ExtractError::HttpStatus { .. })
            | AppError::Extract(ExtractError::Decode(_)) => "protocol",

            AppError::Extract(ExtractError::NoCirculars) => "content",

            AppError::Manifest(ManifestError::Json { .. })
            | AppError::Manifest(ManifestError::Read { .. })
            | AppError::Manifest(ManifestError::NotFound { .. }) => "manifest",

            AppError::Manifest(ManifestError::Write { .. })
            | AppError::Download(DownloadError::OutputDirectory { .. })
            | AppError::Download(DownloadError::FinalSave(_))
            | AppError::Io(_) => "persistence",

            AppError::Config(_)
            | AppError::Fetch(_)
            | AppError::Download(DownloadError::Fetch(_))
            | AppError::Extract(ExtractError::Fetch(_))
            | AppError::Extract(ExtractError::InvalidSelector { .. }) => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Extraction result type alias
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
