//! Resumable, validated document downloads
//!
//! Each record moves through
//! `Pending -> AlreadyValid | Downloading -> Verified | Failed(reason)`.
//! Records are resolved strictly one after another. The manifest is
//! checkpointed through a [`ManifestSink`] every `checkpoint_interval`
//! records (best effort) and saved once more after the last record, which
//! must succeed.

pub mod config;

use std::path::Path;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::app::client::{FetchResponse, HttpFetcher, RequestProfile};
use crate::app::manifest::{CheckpointPolicy, ManifestSink};
use crate::app::models::{CircularRecord, DownloadFailure};
use crate::app::validator::PdfValidator;
use crate::constants::download;
use crate::errors::{DownloadError, DownloadResult, FetchError};

pub use config::DownloaderConfig;

/// How a single record was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A valid file was already on disk; no request was made
    AlreadyValid,
    /// Downloaded and passed the signature check
    Verified { bytes: u64 },
    /// Could not be downloaded
    Failed(DownloadFailure),
    /// The request could not be built, so nothing was sent
    NotSent(DownloadFailure),
}

impl RecordOutcome {
    /// Whether resolving the record contacted the document origin
    pub fn made_request(&self) -> bool {
        !matches!(
            self,
            RecordOutcome::AlreadyValid
                | RecordOutcome::NotSent(_)
                | RecordOutcome::Failed(DownloadFailure::NoUrl)
        )
    }
}

/// Totals for a download run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Records processed
    pub total: usize,
    /// Records skipped because a valid file was already present
    pub already_valid: usize,
    /// Records downloaded in this run
    pub downloaded: usize,
    /// Records that failed
    pub failed: usize,
    /// Bytes written by this run
    pub bytes_downloaded: u64,
    /// Requests sent to the document origin
    pub requests: usize,
}

impl DownloadSummary {
    /// Records that are valid on disk after the run
    pub fn succeeded(&self) -> usize {
        self.already_valid + self.downloaded
    }

    fn record(&mut self, outcome: &RecordOutcome) {
        self.total += 1;
        if outcome.made_request() {
            self.requests += 1;
        }
        match outcome {
            RecordOutcome::AlreadyValid => self.already_valid += 1,
            RecordOutcome::Verified { bytes } => {
                self.downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            RecordOutcome::Failed(_) | RecordOutcome::NotSent(_) => self.failed += 1,
        }
    }
}

/// Downloads the documents referenced by a manifest
pub struct Downloader {
    fetcher: HttpFetcher,
    config: DownloaderConfig,
    progress: ProgressBar,
}

impl Downloader {
    /// Creates a downloader with a hidden progress bar
    pub fn new(fetcher: HttpFetcher, config: DownloaderConfig) -> Self {
        Self {
            fetcher,
            config,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-record progress on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Process every record in order, checkpointing through `sink`
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::OutputDirectory` if the output directory cannot
    /// be created and `DownloadError::FinalSave` if the closing manifest save
    /// fails. Per-record failures are stored in the records instead.
    pub async fn run<S>(
        &self,
        records: &mut [CircularRecord],
        sink: &mut S,
    ) -> DownloadResult<DownloadSummary>
    where
        S: ManifestSink + ?Sized,
    {
        let output_dir = &self.config.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| DownloadError::OutputDirectory {
                path: output_dir.clone(),
                source,
            })?;

        let policy = CheckpointPolicy::every(self.config.checkpoint_interval);
        let total = records.len();
        let mut summary = DownloadSummary::default();
        self.progress.set_length(total as u64);

        info!("Processing {} circulars", total);

        for index in 0..total {
            let record = &mut records[index];
            self.progress.set_message(record.file_name.clone());
            info!("Processing ({}/{}): {}", index + 1, total, record.file_name);

            let outcome = self.process_record(record).await;
            summary.record(&outcome);
            self.progress.inc(1);

            let processed = index + 1;
            if processed == total {
                break;
            }

            // The final save below covers the last record
            if policy.is_due(processed) {
                match sink.save(records).await {
                    Ok(()) => debug!("Checkpoint saved after {} records", processed),
                    Err(e) => warn!("Checkpoint after {} records failed: {}", processed, e),
                }
            }

            if outcome.made_request() && !self.config.request_delay.is_zero() {
                tokio::time::sleep(self.config.request_delay).await;
            }
        }

        self.progress.finish_and_clear();
        sink.save(records).await.map_err(DownloadError::FinalSave)?;

        info!(
            "Download run complete: {} total, {} already present, {} downloaded, {} failed",
            summary.total, summary.already_valid, summary.downloaded, summary.failed
        );
        Ok(summary)
    }

    /// Resolve one record and update its download fields
    pub async fn process_record(&self, record: &mut CircularRecord) -> RecordOutcome {
        let path = record.target_path(&self.config.output_dir);

        if PdfValidator::is_valid_pdf(&path).await {
            info!("{} already exists and is valid, skipping", path.display());
            record.mark_downloaded(timestamp(), None);
            return RecordOutcome::AlreadyValid;
        }

        remove_stale_file(&path).await;

        if record.pdf_url.trim().is_empty() {
            warn!("Skipping circular without PDF URL: {}", record.title);
            record.mark_failed(DownloadFailure::NoUrl);
            return RecordOutcome::Failed(DownloadFailure::NoUrl);
        }

        let outcome = self.download(&record.pdf_url, &path).await;
        match outcome {
            RecordOutcome::Verified { bytes } => record.mark_downloaded(timestamp(), Some(bytes)),
            RecordOutcome::Failed(failure) | RecordOutcome::NotSent(failure) => {
                record.mark_failed(failure)
            }
            RecordOutcome::AlreadyValid => {}
        }
        outcome
    }

    /// Fetch `url` into `path` and confirm the PDF signature
    async fn download(&self, url: &str, path: &Path) -> RecordOutcome {
        info!("Downloading: {}", url);

        let profile = RequestProfile::document(&self.config.referer, self.config.download_timeout);
        let response = match self.fetcher.fetch(url, &profile).await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(
                    "Download timed out after {:?}: {}",
                    self.config.download_timeout, url
                );
                return RecordOutcome::Failed(DownloadFailure::DownloadFailed);
            }
            Err(e @ FetchError::InvalidHeader { .. }) => {
                warn!("Request not sent: {}", e);
                return RecordOutcome::NotSent(DownloadFailure::DownloadFailed);
            }
            Err(e) => {
                warn!("Download failed: {}", e);
                return RecordOutcome::Failed(DownloadFailure::DownloadFailed);
            }
        };

        if !response.is_ok() {
            warn!("HTTP error {} for {}", response.status, url);
            return RecordOutcome::Failed(DownloadFailure::DownloadFailed);
        }

        warn_on_unexpected_content(&response);

        if let Err(e) = write_body(path, &response.body).await {
            warn!("Failed to write file {}: {}", path.display(), e);
            let _ = tokio::fs::remove_file(path).await;
            return RecordOutcome::Failed(DownloadFailure::DownloadFailed);
        }

        if !PdfValidator::is_valid_pdf(path).await {
            warn!("Downloaded file is not a valid PDF, deleting {}", path.display());
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Failed to delete invalid file {}: {}", path.display(), e);
            }
            return RecordOutcome::Failed(DownloadFailure::InvalidPdf);
        }

        let bytes = response.body.len() as u64;
        info!(
            "Successfully downloaded to: {} ({:.2} KB)",
            path.display(),
            bytes as f64 / 1024.0
        );
        RecordOutcome::Verified { bytes }
    }
}

/// Delete a leftover file at `path` that failed the signature check
async fn remove_stale_file(path: &Path) {
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return;
    }
    warn!("Removing invalid existing file {}", path.display());
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to delete invalid file {}: {}", path.display(), e);
    }
}

async fn write_body(path: &Path, body: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, body).await
}

/// Whether a content type looks like a document
pub fn is_expected_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            download::EXPECTED_CONTENT_TYPES
                .iter()
                .any(|expected| ct.contains(expected))
        })
        .unwrap_or(false)
}

/// Content type is advisory; the signature check decides
fn warn_on_unexpected_content(response: &FetchResponse) {
    if is_expected_content_type(response.content_type.as_deref()) {
        return;
    }

    warn!(
        "Content may not be a PDF (Content-Type: {})",
        response.content_type.as_deref().unwrap_or("none")
    );
    if !PdfValidator::has_pdf_signature(&response.body) {
        warn!("Content does not appear to be a valid PDF");
    }
}

fn timestamp() -> String {
    chrono::Local::now()
        .format(download::TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::ClientConfig;
    use crate::errors::{ManifestError, ManifestResult};
    use async_trait::async_trait;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Sink that remembers every snapshot it receives
    #[derive(Default)]
    struct RecordingSink {
        snapshots: Vec<Vec<CircularRecord>>,
    }

    #[async_trait]
    impl ManifestSink for RecordingSink {
        async fn save(&mut self, records: &[CircularRecord]) -> ManifestResult<()> {
            self.snapshots.push(records.to_vec());
            Ok(())
        }
    }

    /// Sink that fails every save
    #[derive(Default)]
    struct FailingSink {
        attempts: usize,
    }

    #[async_trait]
    impl ManifestSink for FailingSink {
        async fn save(&mut self, _records: &[CircularRecord]) -> ManifestResult<()> {
            self.attempts += 1;
            Err(ManifestError::Write {
                path: "manifest.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn record(url: &str, output_dir: &Path, name: &str) -> CircularRecord {
        CircularRecord {
            title: name.to_string(),
            date: "2024-01-01".to_string(),
            ref_no: format!("REF/{}", name),
            pdf_url: url.to_string(),
            file_size: String::new(),
            file_name: format!("{}.pdf", name),
            local_path: output_dir
                .join(format!("{}.pdf", name))
                .to_string_lossy()
                .into_owned(),
            downloaded: None,
            download_time: None,
            file_size_bytes: None,
            download_error: None,
        }
    }

    fn downloader(output_dir: &Path, checkpoint_interval: usize) -> Downloader {
        let fetcher = HttpFetcher::from_config(&ClientConfig::default()).unwrap();
        Downloader::new(
            fetcher,
            DownloaderConfig {
                output_dir: output_dir.to_path_buf(),
                referer: "https://www.cbn.gov.ng/Documents/circulars.html".to_string(),
                download_timeout: Duration::from_secs(5),
                request_delay: Duration::ZERO,
                checkpoint_interval,
            },
        )
    }

    #[tokio::test]
    async fn test_checkpoint_cadence() {
        let dir = TempDir::new().unwrap();
        let mut records: Vec<CircularRecord> = (0..7)
            .map(|i| record("", dir.path(), &format!("doc{}", i)))
            .collect();
        let mut sink = RecordingSink::default();

        let summary = downloader(dir.path(), 3)
            .run(&mut records, &mut sink)
            .await
            .unwrap();

        // Checkpoints after records 3 and 6, then the final save
        assert_eq!(sink.snapshots.len(), 3);
        assert_eq!(sink.snapshots[0][2].download_error.as_deref(), Some("No PDF URL"));
        assert!(sink.snapshots[0][3].download_error.is_none());
        assert_eq!(sink.snapshots[2], records);
        assert_eq!(summary.failed, 7);
        assert_eq!(summary.requests, 0);
    }

    #[tokio::test]
    async fn test_no_duplicate_save_when_last_record_is_due() {
        let dir = TempDir::new().unwrap();
        let mut records: Vec<CircularRecord> = (0..4)
            .map(|i| record("", dir.path(), &format!("doc{}", i)))
            .collect();
        let mut sink = RecordingSink::default();

        downloader(dir.path(), 2)
            .run(&mut records, &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.snapshots.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_manifest_still_saves() {
        let dir = TempDir::new().unwrap();
        let mut records = Vec::new();
        let mut sink = RecordingSink::default();

        let summary = downloader(dir.path(), 5)
            .run(&mut records, &mut sink)
            .await
            .unwrap();

        assert_eq!(summary, DownloadSummary::default());
        assert_eq!(sink.snapshots.len(), 1);
    }

    #[tokio::test]
    async fn test_checkpoint_failure_is_not_fatal_but_final_is() {
        let dir = TempDir::new().unwrap();
        let mut records: Vec<CircularRecord> = (0..3)
            .map(|i| record("", dir.path(), &format!("doc{}", i)))
            .collect();
        let mut sink = FailingSink::default();

        let result = downloader(dir.path(), 1).run(&mut records, &mut sink).await;

        // Two failed checkpoints were tolerated, the final save was not
        assert_eq!(sink.attempts, 3);
        assert!(matches!(result, Err(DownloadError::FinalSave(_))));
        assert!(records.iter().all(|r| r.download_error.is_some()));
    }

    #[tokio::test]
    async fn test_progress_cleared_when_final_save_fails() {
        let dir = TempDir::new().unwrap();
        let mut records = vec![record("", dir.path(), "doc")];
        let mut sink = FailingSink::default();
        let bar = ProgressBar::hidden();

        let result = downloader(dir.path(), 5)
            .with_progress(bar.clone())
            .run(&mut records, &mut sink)
            .await;

        assert!(matches!(result, Err(DownloadError::FinalSave(_))));
        assert!(bar.is_finished());
    }

    #[tokio::test]
    async fn test_unbuildable_request_is_not_counted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let fetcher = HttpFetcher::from_config(&ClientConfig::default()).unwrap();
        let downloader = Downloader::new(
            fetcher,
            DownloaderConfig {
                output_dir: dir.path().to_path_buf(),
                referer: "https://www.cbn.gov.ng/\nDocuments".to_string(),
                download_timeout: Duration::from_secs(5),
                request_delay: Duration::ZERO,
                checkpoint_interval: 5,
            },
        );
        let mut records = vec![record(&format!("{}/Out/c.pdf", server.uri()), dir.path(), "c")];
        let mut sink = RecordingSink::default();

        let summary = downloader.run(&mut records, &mut sink).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.requests, 0);
        assert_eq!(records[0].download_error.as_deref(), Some("Download failed"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_sends_document_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Out/a.pdf"))
            .and(header("accept", "application/pdf,application/octet-stream"))
            .and(header("referer", "https://www.cbn.gov.ng/Documents/circulars.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.7 body".to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut target = record(&format!("{}/Out/a.pdf", server.uri()), dir.path(), "a");

        let outcome = downloader(dir.path(), 5).process_record(&mut target).await;

        assert_eq!(outcome, RecordOutcome::Verified { bytes: 13 });
        assert!(target.is_downloaded());
        assert_eq!(target.file_size_bytes, Some(13));
        assert!(target.download_time.is_some());
        assert!(target.download_error.is_none());
    }

    #[tokio::test]
    async fn test_unexpected_content_type_is_advisory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(b"%PDF-1.4 served as html".to_vec()),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut target = record(&format!("{}/b.pdf", server.uri()), dir.path(), "b");

        let outcome = downloader(dir.path(), 5).process_record(&mut target).await;
        assert!(matches!(outcome, RecordOutcome::Verified { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_marks_download_failed() {
        let dir = TempDir::new().unwrap();
        let mut target = record("http://127.0.0.1:9/gone.pdf", dir.path(), "gone");

        let outcome = downloader(dir.path(), 5).process_record(&mut target).await;

        assert_eq!(outcome, RecordOutcome::Failed(DownloadFailure::DownloadFailed));
        assert!(outcome.made_request());
        assert_eq!(target.download_error.as_deref(), Some("Download failed"));
    }

    #[tokio::test]
    async fn test_local_path_missing_uses_output_dir() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("existing.pdf"), b"%PDF-1.4")
            .await
            .unwrap();

        let mut target = record("https://www.cbn.gov.ng/Out/existing.pdf", dir.path(), "existing");
        target.local_path.clear();

        let outcome = downloader(dir.path(), 5).process_record(&mut target).await;
        assert_eq!(outcome, RecordOutcome::AlreadyValid);
    }

    #[test]
    fn test_is_expected_content_type() {
        assert!(is_expected_content_type(Some("application/pdf")));
        assert!(is_expected_content_type(Some("Application/Octet-Stream")));
        assert!(is_expected_content_type(Some("application/x-download")));
        assert!(!is_expected_content_type(Some("text/html; charset=utf-8")));
        assert!(!is_expected_content_type(None));
    }

    #[test]
    fn test_made_request() {
        assert!(!RecordOutcome::AlreadyValid.made_request());
        assert!(!RecordOutcome::Failed(DownloadFailure::NoUrl).made_request());
        assert!(RecordOutcome::Failed(DownloadFailure::InvalidPdf).made_request());
        assert!(!RecordOutcome::NotSent(DownloadFailure::DownloadFailed).made_request());
        assert!(RecordOutcome::Verified { bytes: 1 }.made_request());
    }
}
