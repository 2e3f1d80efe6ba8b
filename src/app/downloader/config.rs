//! Download phase configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{cbn, download, files, http};

/// Configuration for a download run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Directory for records whose manifest entry lacks a `local_path`
    pub output_dir: PathBuf,
    /// `Referer` sent with every document request
    pub referer: String,
    /// Timeout for a single document download
    pub download_timeout: Duration,
    /// Pause after each record that hit the network
    pub request_delay: Duration,
    /// Records processed between manifest checkpoints
    pub checkpoint_interval: usize,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(files::OUTPUT_DIR),
            referer: cbn::LISTING_URL.to_string(),
            download_timeout: http::DOWNLOAD_TIMEOUT,
            request_delay: download::REQUEST_DELAY,
            checkpoint_interval: download::CHECKPOINT_INTERVAL,
        }
    }
}
