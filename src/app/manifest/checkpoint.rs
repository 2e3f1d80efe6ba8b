//! Checkpoint cadence for the download phase

use crate::constants::download;

/// How often the in-memory manifest is flushed during a download run
///
/// A checkpoint is due after every `interval` processed records. The final
/// save after the last record is not governed by the policy; it always happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointPolicy {
    interval: usize,
}

impl CheckpointPolicy {
    /// Checkpoint every `interval` records; zero is treated as one
    pub fn every(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    /// Records between checkpoints
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Whether a checkpoint is due after `processed` records (1-based count)
    pub fn is_due(&self, processed: usize) -> bool {
        processed > 0 && processed % self.interval == 0
    }
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self::every(download::CHECKPOINT_INTERVAL)
    }
}
