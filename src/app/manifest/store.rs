//! File-backed manifest persistence
//!
//! The manifest is always read and written whole. Writes go to a sibling
//! temporary file that is renamed over the target, so an interrupted save
//! leaves the previous snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::app::models::CircularRecord;
use crate::constants::files;
use crate::errors::{ManifestError, ManifestResult};

/// Destination for full-manifest snapshots
///
/// The downloader only needs this capability, so tests can count or fail
/// checkpoints without touching the filesystem.
#[async_trait]
pub trait ManifestSink: Send {
    /// Persist the complete ordered record list, replacing any previous snapshot
    async fn save(&mut self, records: &[CircularRecord]) -> ManifestResult<()>;
}

/// JSON manifest file on disk
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    /// Creates a store for the manifest at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the manifest file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the manifest file exists
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Loads the full record list
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::NotFound` if the file does not exist,
    /// `ManifestError::Read` on I/O failure and `ManifestError::Json` if the
    /// content is not an array of records.
    pub async fn load(&self) -> ManifestResult<Vec<CircularRecord>> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                ManifestError::Read {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        let records: Vec<CircularRecord> =
            serde_json::from_slice(&content).map_err(|e| ManifestError::Json {
                path: self.path.clone(),
                source: e,
            })?;

        debug!(
            "Loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Writes the full record list, replacing the previous file
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Write` if the parent directory, the temporary
    /// file or the final rename cannot be written.
    pub async fn write(&self, records: &[CircularRecord]) -> ManifestResult<()> {
        let json = Self::to_pretty_json(records).map_err(|e| ManifestError::Json {
            path: self.path.clone(),
            source: e,
        })?;

        let write_error = |source: std::io::Error| ManifestError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(write_error)?;
            }
        }

        let mut temp_name = self.path.as_os_str().to_os_string();
        temp_name.push(files::TEMP_FILE_SUFFIX);
        let temp_path = PathBuf::from(temp_name);

        tokio::fs::write(&temp_path, json)
            .await
            .map_err(write_error)?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(e));
        }

        debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Human-readable JSON with four-space indentation and unescaped slashes
    fn to_pretty_json(records: &[CircularRecord]) -> serde_json::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        records.serialize(&mut serializer)?;
        Ok(buffer)
    }
}

#[async_trait]
impl ManifestSink for ManifestStore {
    async fn save(&mut self, records: &[CircularRecord]) -> ManifestResult<()> {
        self.write(records).await
    }
}
