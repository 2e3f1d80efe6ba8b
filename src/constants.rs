//! Application constants for Circular Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for configuration overrides
pub mod env {
    /// Overrides the manifest file location
    pub const MANIFEST_PATH: &str = "CIRCULAR_FETCHER_MANIFEST";

    /// Overrides the PDF output directory
    pub const OUTPUT_DIR: &str = "CIRCULAR_FETCHER_OUTPUT_DIR";
}

/// CBN endpoints
pub mod cbn {
    /// Origin used to complete relative document links
    pub const BASE_URL: &str = "https://www.cbn.gov.ng";

    /// Structured listing endpoint returning a JSON array of circulars
    pub const API_URL: &str = "https://www.cbn.gov.ng/api/GetAllCirculars";

    /// Rendered listing page, also sent as the `Referer` for every request
    pub const LISTING_URL: &str = "https://www.cbn.gov.ng/Documents/circulars.html";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Browser-like user agent; the origin rejects obvious scripts for documents
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    /// Timeout for listing requests
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Timeout for a single document download
    pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;

    /// `Accept` header for the structured listing request
    pub const ACCEPT_JSON: &str = "application/json";

    /// `Accept` header for the rendered listing page
    pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

    /// `Accept` header for document downloads
    pub const ACCEPT_DOCUMENT: &str = "application/pdf,application/octet-stream";

    /// `Accept-Language` header for document downloads
    pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

    /// `X-Requested-With` value marking script-originated listing requests
    pub const REQUESTED_WITH: &str = "XMLHttpRequest";
}

/// Download pipeline pacing and checkpointing
pub mod download {
    use super::Duration;

    /// Records processed between manifest checkpoints
    pub const CHECKPOINT_INTERVAL: usize = 5;

    /// Pause after each network request to the document origin
    pub const REQUEST_DELAY: Duration = Duration::from_secs(1);

    /// Content-type fragments accepted without a warning
    pub const EXPECTED_CONTENT_TYPES: &[&str] = &["pdf", "octet-stream", "application"];

    /// Timestamp format stamped into `download_time`
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// PDF signature check
pub mod pdf {
    /// Leading bytes of every PDF document
    pub const MAGIC: &[u8; 4] = b"%PDF";
}

/// HTML selectors for the listing page fallback
pub mod selectors {
    /// Data grid rows on the rendered listing page
    pub const LISTING_ROW_SELECTOR: &str = "table.dbasetable tr";

    /// Cells within a row
    pub const CELL_SELECTOR: &str = "td";

    /// Document link within a cell
    pub const LINK_SELECTOR: &str = "a[href]";

    /// Element id wrapping the table in a saved page snapshot
    pub const SNAPSHOT_CONTAINER_ID: &str = "circulars";
}

/// File operation constants
pub mod files {
    /// Default manifest location
    pub const MANIFEST_FILE_NAME: &str = "cbn_circulars.json";

    /// Default PDF output directory
    pub const OUTPUT_DIR: &str = "pdf_downloads/";

    /// Temporary file suffix for atomic manifest writes
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// File written by the debug dump hook
    pub const DEBUG_DUMP_FILE_NAME: &str = "api_response.txt";
}

/// Logging and debugging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

// Re-export commonly used constants for convenience
pub use cbn::{API_URL, BASE_URL, LISTING_URL};
pub use download::{CHECKPOINT_INTERVAL, REQUEST_DELAY};
pub use files::{MANIFEST_FILE_NAME, OUTPUT_DIR};
pub use http::USER_AGENT;
pub use pdf::MAGIC as PDF_MAGIC;
