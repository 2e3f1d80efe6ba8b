//! Manifest statistics for the `status` command

use crate::app::models::{CircularRecord, RecordStatus};

/// Counts of records by download status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSummary {
    /// Records in the manifest
    pub total: usize,
    /// Records marked as downloaded
    pub downloaded: usize,
    /// Records whose last attempt failed
    pub failed: usize,
    /// Records never processed
    pub pending: usize,
    /// Sum of `file_size_bytes` over downloaded records
    pub total_bytes: u64,
}

impl ManifestSummary {
    /// Summarize a record list
    pub fn from_records(records: &[CircularRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            match record.status() {
                RecordStatus::Downloaded => {
                    summary.downloaded += 1;
                    summary.total_bytes += record.file_size_bytes.unwrap_or(0);
                }
                RecordStatus::Failed => summary.failed += 1,
                RecordStatus::Pending => summary.pending += 1,
            }
        }

        summary
    }

    /// Percentage of records downloaded
    pub fn completion_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.downloaded as f64 / self.total as f64) * 100.0
        }
    }
}
