//! Manifest persistence and checkpointing
//!
//! The manifest is the single source of truth shared by the extraction and
//! download phases: an ordered JSON array of [`CircularRecord`]s written in
//! full on every save.
//!
//! # Module Organization
//!
//! - [`store`] - JSON file store and the [`ManifestSink`] capability used by the downloader
//! - [`checkpoint`] - checkpoint cadence ([`CheckpointPolicy`])
//! - [`summary`] - status counts over a record list
//!
//! # Examples
//!
//! ```rust,no_run
//! use circular_fetcher::app::manifest::{ManifestStore, ManifestSummary};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ManifestStore::new("cbn_circulars.json");
//! let records = store.load().await?;
//! let summary = ManifestSummary::from_records(&records);
//! println!("{} of {} downloaded", summary.downloaded, summary.total);
//! # Ok(())
//! # }
//! ```
//!
//! [`CircularRecord`]: crate::app::models::CircularRecord

pub mod checkpoint;
pub mod store;
pub mod summary;

pub use checkpoint::CheckpointPolicy;
pub use store::{ManifestSink, ManifestStore};
pub use summary::ManifestSummary;
