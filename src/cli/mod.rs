//! Command-line interface components
//!
//! This module contains CLI-specific code for the circular fetcher,
//! including argument parsing, command handlers and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands, DownloadArgs, ExtractArgs, GlobalArgs, StatusArgs};
pub use commands::{handle_download, handle_extract, handle_status};
pub use progress::{record_progress_bar, ProgressConfig};
