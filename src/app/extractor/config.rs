//! Extraction source configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{cbn, files, selectors};

/// Where the listing comes from and where its documents will be stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Structured listing endpoint
    pub api_url: String,
    /// Rendered listing page, also used as `Referer`
    pub listing_url: String,
    /// Origin used to complete relative document links
    pub base_url: String,
    /// Row selector for the data grid on the listing page
    pub row_selector: String,
    /// Saved listing page consulted when the live page yields nothing
    pub snapshot_path: Option<PathBuf>,
    /// Id of the element wrapping the table inside the snapshot
    pub snapshot_container_id: String,
    /// Directory receiving the raw API body when it fails to decode
    pub debug_dump_dir: Option<PathBuf>,
    /// Directory prefix for each record's `local_path`
    pub output_dir: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: cbn::API_URL.to_string(),
            listing_url: cbn::LISTING_URL.to_string(),
            base_url: cbn::BASE_URL.to_string(),
            row_selector: selectors::LISTING_ROW_SELECTOR.to_string(),
            snapshot_path: None,
            snapshot_container_id: selectors::SNAPSHOT_CONTAINER_ID.to_string(),
            debug_dump_dir: None,
            output_dir: PathBuf::from(files::OUTPUT_DIR),
        }
    }
}
