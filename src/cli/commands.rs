//! Command handlers for the circular fetcher CLI
//!
//! This module implements the command handlers that coordinate between CLI
//! arguments, the loaded configuration and the core application components.

use std::time::Instant;

use tracing::{info, warn};

use crate::app::{
    CircularRecord, Downloader, Extractor, HttpFetcher, ManifestStore, ManifestSummary,
    RecordStatus,
};
use crate::cli::{record_progress_bar, DownloadArgs, ExtractArgs, ProgressConfig, StatusArgs};
use crate::config::AppConfig;
use crate::errors::Result;

/// Handle the extract command
///
/// Reads the listing, prepares the output directory and writes a fresh
/// manifest. Fails if no circulars are found or the manifest cannot be
/// written.
pub async fn handle_extract(args: ExtractArgs, mut config: AppConfig) -> Result<()> {
    let start_time = Instant::now();
    args.apply_to(&mut config);

    let (source, client, _) = config.to_runtime_config()?;
    let output_dir = source.output_dir.clone();
    let fetcher = HttpFetcher::from_config(&client)?;
    let extractor = Extractor::new(fetcher, source);

    let extraction = extractor.extract_with_source().await?;

    tokio::fs::create_dir_all(&output_dir).await?;

    let store = ManifestStore::new(&config.download.manifest_path);
    store.write(&extraction.records).await?;

    info!(
        "Extraction completed in {:?}: {} circulars via {:?}",
        start_time.elapsed(),
        extraction.records.len(),
        extraction.source
    );
    println!(
        "Found {} circulars. Saved to {}",
        extraction.records.len(),
        store.path().display()
    );
    println!("Output directory: {}", output_dir.display());

    Ok(())
}

/// Handle the download command
///
/// Loads the manifest, resolves every record in order and saves the manifest
/// back, checkpointing along the way.
pub async fn handle_download(args: DownloadArgs, mut config: AppConfig, quiet: bool) -> Result<()> {
    let start_time = Instant::now();
    args.apply_to(&mut config);

    let (_, client, downloader_config) = config.to_runtime_config()?;
    let mut store = ManifestStore::new(&config.download.manifest_path);
    let mut records = store.load().await?;

    info!(
        "Loaded {} circulars from {}",
        records.len(),
        store.path().display()
    );

    let progress = record_progress_bar(&ProgressConfig {
        enable_progress_bar: !quiet && !args.no_progress,
        ..Default::default()
    });

    let fetcher = HttpFetcher::from_config(&client)?;
    let output_dir = downloader_config.output_dir.clone();
    let downloader = Downloader::new(fetcher, downloader_config).with_progress(progress);

    let summary = downloader.run(&mut records, &mut store).await?;

    println!("\n📊 Download Summary:");
    println!("  Total circulars: {}", summary.total);
    println!("  Already present: {}", summary.already_valid);
    println!("  Downloaded: {}", summary.downloaded);
    println!("  Failed: {}", summary.failed);
    println!("  Total time: {:?}", start_time.elapsed());
    println!("  Output directory: {}", output_dir.display());
    println!("  Manifest: {}", store.path().display());

    if summary.failed > 0 {
        warn!(
            "{} circulars could not be downloaded; run 'status --failed' for details",
            summary.failed
        );
    }

    Ok(())
}

/// Handle the status command
pub async fn handle_status(args: StatusArgs, mut config: AppConfig) -> Result<()> {
    args.apply_to(&mut config);

    let store = ManifestStore::new(&config.download.manifest_path);
    let records = store.load().await?;
    let summary = ManifestSummary::from_records(&records);

    println!("📋 Manifest: {}", store.path().display());
    println!("  Total circulars: {}", summary.total);
    println!("  Downloaded: {}", summary.downloaded);
    println!("  Failed: {}", summary.failed);
    println!("  Pending: {}", summary.pending);
    println!(
        "  Downloaded size: {:.2} MB",
        summary.total_bytes as f64 / (1024.0 * 1024.0)
    );
    println!("  Completion: {:.1}%", summary.completion_percentage());

    if args.failed {
        let failed = failed_records(&records);
        if failed.is_empty() {
            println!("\nNo failed circulars.");
        } else {
            println!("\nFailed circulars:");
            for record in failed {
                println!(
                    "  • {} [{}]: {}",
                    record.file_name,
                    record.ref_no,
                    record.download_error.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    Ok(())
}

fn failed_records(records: &[CircularRecord]) -> Vec<&CircularRecord> {
    records
        .iter()
        .filter(|record| record.status() == RecordStatus::Failed)
        .collect()
}
