//! Progress display for download runs
//!
//! A single bar over the manifest's records. It is drawn only when stderr is
//! an interactive terminal; otherwise a hidden bar is returned and the
//! per-record log lines carry the progress instead.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar template for record-level progress
const RECORD_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Configuration for progress display
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Enable the progress bar
    pub enable_progress_bar: bool,
    /// Spinner tick rate
    pub tick_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enable_progress_bar: true,
            tick_interval: Duration::from_millis(120),
        }
    }
}

impl ProgressConfig {
    /// Whether a bar would actually be drawn
    pub fn is_visible(&self) -> bool {
        self.enable_progress_bar && atty::is(atty::Stream::Stderr)
    }
}

/// Build the record progress bar; its length is set by the downloader
pub fn record_progress_bar(config: &ProgressConfig) -> ProgressBar {
    if !config.is_visible() {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_bar()
        .template(RECORD_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

    let bar = ProgressBar::new(0);
    bar.set_style(style);
    bar.enable_steady_tick(config.tick_interval);
    bar
}
