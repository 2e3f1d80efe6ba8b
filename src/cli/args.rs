//! Command-line argument parsing for the circular fetcher
//!
//! This module defines the CLI structure using clap derive macros. Each
//! subcommand's flags override the matching configuration file values.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;

/// Circular Fetcher - Archive Central Bank of Nigeria circulars
#[derive(Parser, Debug)]
#[command(
    name = "circular_fetcher",
    version,
    about = "Harvest the CBN circular listing and download every referenced PDF",
    long_about = "Builds a JSON manifest of Central Bank of Nigeria circulars from the public listing,
then downloads each referenced PDF with signature validation. Downloads resume where the
previous run stopped: files already present and valid are never fetched again."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the manifest from the circular listing
    Extract(ExtractArgs),

    /// Download every PDF referenced by the manifest
    Download(DownloadArgs),

    /// Summarize manifest download state
    Status(StatusArgs),
}

/// Arguments for the extract command
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractArgs {
    /// Manifest file to write
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Directory the documents will be stored in
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Saved listing page to parse when the live sources yield nothing
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Directory receiving the raw API response when it fails to decode
    #[arg(long, value_name = "DIR")]
    pub debug_dump: Option<PathBuf>,
}

/// Arguments for the download command
#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Manifest file to read and update
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Directory for records without a local path
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Records processed between manifest checkpoints
    #[arg(long, value_name = "N")]
    pub checkpoint_interval: Option<usize>,

    /// Pause after each request in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the status command
#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    /// Manifest file to inspect
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// List every failed record with its reason
    #[arg(long)]
    pub failed: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// Falls back to `configured` when no verbosity flag is given.
    pub fn log_level(&self, configured: tracing::Level) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            configured
        }
    }
}

impl ExtractArgs {
    /// Apply these flags on top of the loaded configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(manifest) = &self.manifest {
            config.download.manifest_path = manifest.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.download.output_dir = dir.clone();
        }
        if let Some(snapshot) = &self.snapshot {
            config.source.snapshot_path = Some(snapshot.clone());
        }
        if let Some(dir) = &self.debug_dump {
            config.source.debug_dump_dir = Some(dir.clone());
        }
    }
}

impl DownloadArgs {
    /// Apply these flags on top of the loaded configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(manifest) = &self.manifest {
            config.download.manifest_path = manifest.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.download.output_dir = dir.clone();
        }
        if let Some(interval) = self.checkpoint_interval {
            config.download.checkpoint_interval = interval;
        }
        if let Some(delay) = self.delay_ms {
            config.download.request_delay_ms = delay;
        }
    }
}

impl StatusArgs {
    /// Apply these flags on top of the loaded configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(manifest) = &self.manifest {
            config.download.manifest_path = manifest.clone();
        }
    }
}
