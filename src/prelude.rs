//! Prelude module for the circular fetcher library
//!
//! Re-exports the items needed for a typical extract-then-download
//! integration with a single `use circular_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use circular_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fetcher = HttpFetcher::from_config(&ClientConfig::default())?;
//!     let mut store = ManifestStore::new(MANIFEST_FILE_NAME);
//!     let mut records = store.load().await?;
//!
//!     let downloader = Downloader::new(fetcher, DownloaderConfig::default());
//!     downloader.run(&mut records, &mut store).await?;
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components
pub use crate::app::{
    CircularRecord, ClientConfig, DownloadSummary, Downloader, DownloaderConfig, Extractor,
    HttpFetcher, ManifestSink, ManifestStore, ManifestSummary, PdfValidator, SourceConfig,
};

// Commonly used constants
pub use crate::constants::{MANIFEST_FILE_NAME, OUTPUT_DIR, USER_AGENT};

pub use std::path::{Path, PathBuf};
