//! Core application logic for the circular fetcher
//!
//! This module contains the HTTP client, record models, listing extraction,
//! manifest persistence, PDF validation and the resumable downloader.
//!
//! # Examples
//!
//! ```rust,no_run
//! use circular_fetcher::app::{
//!     ClientConfig, Downloader, DownloaderConfig, Extractor, HttpFetcher, ManifestStore,
//!     SourceConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::from_config(&ClientConfig::default())?;
//!
//! // Build the manifest from the listing
//! let extractor = Extractor::new(fetcher.clone(), SourceConfig::default());
//! let mut records = extractor.extract().await?;
//! let mut store = ManifestStore::new("cbn_circulars.json");
//! store.write(&records).await?;
//!
//! // Fetch every document it references
//! let downloader = Downloader::new(fetcher, DownloaderConfig::default());
//! let summary = downloader.run(&mut records, &mut store).await?;
//! println!("{} of {} available", summary.succeeded(), summary.total);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod downloader;
pub mod extractor;
pub mod manifest;
pub mod models;
pub mod validator;

// Re-export main public API
pub use client::{ClientConfig, FetchResponse, HttpFetcher, RequestProfile};
pub use downloader::{DownloadSummary, Downloader, DownloaderConfig, RecordOutcome};
pub use extractor::{Extraction, Extractor, ListingSource, SourceConfig};
pub use manifest::{CheckpointPolicy, ManifestSink, ManifestStore, ManifestSummary};
pub use models::{CircularRecord, DownloadFailure, RawCircular, RecordStatus};
pub use validator::PdfValidator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.follow_redirects);
        assert_eq!(DownloaderConfig::default().checkpoint_interval, 5);
    }
}
