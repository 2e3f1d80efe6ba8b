//! Saved page snapshot parsing
//!
//! A diagnostic last resort: when the live page yields nothing, a locally
//! saved copy of the listing page can be parsed instead. A missing or
//! unreadable snapshot is reported as an empty result.

use std::path::Path;

use tracing::{debug, warn};

use crate::app::extractor::html::{extract_rows, HtmlDocument};
use crate::app::models::RawCircular;
use crate::errors::ExtractResult;

/// Row selector for a snapshot whose table sits inside `#container_id`
pub fn snapshot_row_selector(container_id: &str) -> String {
    format!("#{} tr", container_id)
}

/// Parse rows from a saved listing page
///
/// # Errors
///
/// Returns `ExtractError::InvalidSelector` if `container_id` does not form a
/// valid selector.
pub async fn load_snapshot(path: &Path, container_id: &str) -> ExtractResult<Vec<RawCircular>> {
    let source = match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No page snapshot at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            warn!("Ignoring unreadable page snapshot {}: {}", path.display(), e);
            return Ok(Vec::new());
        }
    };

    let document = HtmlDocument::parse(&source);
    extract_rows(&document, &snapshot_row_selector(container_id))
}
