//! Listing extraction with fallbacks
//!
//! Circulars are read from the structured listing API first. When that body
//! does not decode (or decodes to nothing usable) the rendered listing page
//! is parsed instead, and as a last diagnostic resort a saved snapshot of the
//! page. Every path produces the same [`CircularRecord`] shape.
//!
//! - [`api`] - structured JSON decoding
//! - [`html`] - structural query over the rendered data grid
//! - [`snapshot`] - saved page fallback
//! - [`config`] - endpoints and output location

pub mod api;
pub mod config;
pub mod html;
pub mod snapshot;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::app::client::{HttpFetcher, RequestProfile};
use crate::app::models::{CircularRecord, RawCircular};
use crate::constants::files;
use crate::errors::{ExtractError, ExtractResult};

pub use config::SourceConfig;
pub use html::{CellLink, HtmlDocument, StructuralQuery, TableCell, TableRow};

/// Extraction path that produced the records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    /// Structured listing API
    Api,
    /// Rendered listing page
    ListingPage,
    /// Saved page snapshot
    Snapshot,
}

/// Records found by an extraction run
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Normalized records in listing order
    pub records: Vec<CircularRecord>,
    /// Path that produced them
    pub source: ListingSource,
}

/// Reads the circular listing and normalizes it into manifest records
pub struct Extractor {
    fetcher: HttpFetcher,
    config: SourceConfig,
}

impl Extractor {
    /// Creates an extractor for the configured source
    pub fn new(fetcher: HttpFetcher, config: SourceConfig) -> Self {
        Self { fetcher, config }
    }

    /// Source configuration in use
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Extract all circulars
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Fetch` or `ExtractError::HttpStatus` if the
    /// listing API cannot be reached, and `ExtractError::NoCirculars` if every
    /// path comes back empty.
    pub async fn extract(&self) -> ExtractResult<Vec<CircularRecord>> {
        Ok(self.extract_with_source().await?.records)
    }

    /// Extract all circulars, reporting which path produced them
    ///
    /// # Errors
    ///
    /// See [`Extractor::extract`].
    pub async fn extract_with_source(&self) -> ExtractResult<Extraction> {
        info!("Fetching circular listing from {}", self.config.api_url);

        let raw = match self.fetch_structured().await {
            Ok(raw) => raw,
            Err(ExtractError::Decode(e)) => {
                warn!("Listing API response did not decode ({}), falling back to listing page", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let records = self.normalize(raw);
        if !records.is_empty() {
            return Ok(self.found(records, ListingSource::Api));
        }

        let records = self.normalize(self.fetch_listing_page().await?);
        if !records.is_empty() {
            return Ok(self.found(records, ListingSource::ListingPage));
        }

        if let Some(path) = &self.config.snapshot_path {
            info!("Listing page yielded nothing, trying snapshot {}", path.display());
            let raw =
                snapshot::load_snapshot(path, &self.config.snapshot_container_id).await?;
            let records = self.normalize(raw);
            if !records.is_empty() {
                return Ok(self.found(records, ListingSource::Snapshot));
            }
        }

        Err(ExtractError::NoCirculars)
    }

    fn found(&self, records: Vec<CircularRecord>, source: ListingSource) -> Extraction {
        info!("Found {} circulars via {:?}", records.len(), source);
        Extraction { records, source }
    }

    /// Fetch and decode the structured listing
    async fn fetch_structured(&self) -> ExtractResult<Vec<RawCircular>> {
        let url = &self.config.api_url;
        let response = self
            .fetcher
            .fetch(url, &RequestProfile::listing_api(&self.config.listing_url))
            .await?;

        if !response.is_ok() {
            return Err(ExtractError::HttpStatus {
                url: url.clone(),
                status: response.status,
            });
        }

        let decoded = api::decode_listing(&response.body);
        if decoded.is_err() {
            if let Some(dir) = &self.config.debug_dump_dir {
                dump_response(dir, &response.body).await;
            }
        }
        decoded
    }

    /// Fetch and parse the rendered listing page
    ///
    /// Transport failures and error statuses are logged and yield nothing so
    /// the snapshot fallback still gets a chance.
    async fn fetch_listing_page(&self) -> ExtractResult<Vec<RawCircular>> {
        let url = &self.config.listing_url;
        info!("Parsing rendered listing page {}", url);

        let response = match self
            .fetcher
            .fetch(url, &RequestProfile::listing_page(url))
            .await
        {
            Ok(response) if response.is_ok() => response,
            Ok(response) => {
                warn!("Listing page returned HTTP {}", response.status);
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!("Listing page request failed: {}", e);
                return Ok(Vec::new());
            }
        };

        let document = HtmlDocument::parse(&response.text());
        html::extract_rows(&document, &self.config.row_selector)
    }

    fn normalize(&self, raw: Vec<RawCircular>) -> Vec<CircularRecord> {
        let total = raw.len();
        let records: Vec<CircularRecord> = raw
            .into_iter()
            .filter_map(|item| item.into_record(&self.config.base_url, &self.config.output_dir))
            .collect();

        if records.len() < total {
            debug!("Dropped {} listing entries without a link", total - records.len());
        }
        records
    }
}

/// Write a body that failed to decode for later inspection
async fn dump_response(dir: &Path, body: &[u8]) {
    let path = dir.join(files::DEBUG_DUMP_FILE_NAME);
    let result = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, body).await
    }
    .await;

    match result {
        Ok(()) => info!("Wrote undecodable listing response to {}", path.display()),
        Err(e) => warn!("Failed to write debug dump {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::ClientConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_BODY: &str = r#"[
        {"title": "Revised Cash Withdrawal Limits", "documentDate": "06/12/2023", "refNo": "FPR/DIR/GEN/CIR/07/010", "link": "/Out/2024/CCD/Cash Withdrawal.pdf", "filesize": "245 KB"},
        {"title": "External link", "documentDate": "01/02/2024", "refNo": "BSD/1", "link": "https://cdn.example.com/notice.pdf", "filesize": ""},
        {"title": "No document", "documentDate": "01/02/2024", "refNo": "BSD/2", "link": "  "}
    ]"#;

    const LISTING_PAGE: &str = r#"<html><body><table class="dbasetable">
        <tr><th>Ref</th><th>Title</th><th>Date</th><th>Size</th></tr>
        <tr><td>FPR/DIR/GEN/CIR/07/010</td><td><a href="/Out/2024/CCD/Cash Withdrawal.pdf">Revised Cash Withdrawal Limits</a></td><td>06/12/2023</td><td>245 KB</td></tr>
    </table></body></html>"#;

    fn extractor(server: &MockServer, configure: impl FnOnce(&mut SourceConfig)) -> Extractor {
        let mut config = SourceConfig {
            api_url: format!("{}/api/GetAllCirculars", server.uri()),
            listing_url: format!("{}/Documents/circulars.html", server.uri()),
            base_url: "https://www.cbn.gov.ng".to_string(),
            output_dir: PathBuf::from("pdf_downloads/"),
            ..Default::default()
        };
        configure(&mut config);
        let fetcher = HttpFetcher::from_config(&ClientConfig::default()).unwrap();
        Extractor::new(fetcher, config)
    }

    async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_structured_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/GetAllCirculars"))
            .and(header("x-requested-with", "XMLHttpRequest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(API_BODY))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/Documents/circulars.html"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let extraction = extractor(&server, |_| {}).extract_with_source().await.unwrap();

        assert_eq!(extraction.source, ListingSource::Api);
        let records = extraction.records;
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].pdf_url,
            "https://www.cbn.gov.ng/Out/2024/CCD/Cash Withdrawal.pdf"
        );
        assert_eq!(records[0].file_name, "Cash_Withdrawal.pdf");
        assert_eq!(records[0].local_path, "pdf_downloads/Cash_Withdrawal.pdf");
        assert_eq!(records[1].pdf_url, "https://cdn.example.com/notice.pdf");
    }

    #[tokio::test]
    async fn test_fallback_matches_structured_fields() {
        let structured_server = MockServer::start().await;
        mount(
            &structured_server,
            "/api/GetAllCirculars",
            ResponseTemplate::new(200).set_body_string(API_BODY),
        )
        .await;

        let fallback_server = MockServer::start().await;
        mount(
            &fallback_server,
            "/api/GetAllCirculars",
            ResponseTemplate::new(200).set_body_string("<html>Request blocked</html>"),
        )
        .await;
        mount(
            &fallback_server,
            "/Documents/circulars.html",
            ResponseTemplate::new(200).set_body_string(LISTING_PAGE),
        )
        .await;

        let structured = extractor(&structured_server, |_| {}).extract().await.unwrap();
        let fallback = extractor(&fallback_server, |_| {})
            .extract_with_source()
            .await
            .unwrap();

        assert_eq!(fallback.source, ListingSource::ListingPage);
        assert_eq!(fallback.records.len(), 1);
        assert_eq!(fallback.records[0], structured[0]);
    }

    #[tokio::test]
    async fn test_empty_structured_listing_falls_back() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/api/GetAllCirculars",
            ResponseTemplate::new(200).set_body_string("[]"),
        )
        .await;
        mount(
            &server,
            "/Documents/circulars.html",
            ResponseTemplate::new(200).set_body_string(LISTING_PAGE),
        )
        .await;

        let extraction = extractor(&server, |_| {}).extract_with_source().await.unwrap();
        assert_eq!(extraction.source, ListingSource::ListingPage);
    }

    #[tokio::test]
    async fn test_api_error_status_is_fatal() {
        let server = MockServer::start().await;
        mount(&server, "/api/GetAllCirculars", ResponseTemplate::new(500)).await;

        let result = extractor(&server, |_| {}).extract().await;
        assert!(matches!(
            result,
            Err(ExtractError::HttpStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_snapshot_fallback_and_debug_dump() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/api/GetAllCirculars",
            ResponseTemplate::new(200).set_body_string("not json"),
        )
        .await;
        mount(&server, "/Documents/circulars.html", ResponseTemplate::new(503)).await;

        let dir = TempDir::new().unwrap();
        let snapshot_path = dir.path().join("circulars.html");
        tokio::fs::write(
            &snapshot_path,
            r#"<div id="circulars"><table><tr><td>REF/9</td><td><a href="/Out/snap.pdf">Snapshot</a></td><td>2024</td></tr></table></div>"#,
        )
        .await
        .unwrap();
        let dump_dir = dir.path().join("debug");

        let extraction = extractor(&server, |config| {
            config.snapshot_path = Some(snapshot_path.clone());
            config.debug_dump_dir = Some(dump_dir.clone());
        })
        .extract_with_source()
        .await
        .unwrap();

        assert_eq!(extraction.source, ListingSource::Snapshot);
        assert_eq!(extraction.records[0].pdf_url, "https://www.cbn.gov.ng/Out/snap.pdf");

        let dumped = tokio::fs::read_to_string(dump_dir.join(files::DEBUG_DUMP_FILE_NAME))
            .await
            .unwrap();
        assert_eq!(dumped, "not json");
    }

    #[tokio::test]
    async fn test_all_paths_empty_fails() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/api/GetAllCirculars",
            ResponseTemplate::new(200).set_body_string("{}"),
        )
        .await;
        mount(
            &server,
            "/Documents/circulars.html",
            ResponseTemplate::new(200).set_body_string("<html><body></body></html>"),
        )
        .await;

        let dir = TempDir::new().unwrap();
        let result = extractor(&server, |config| {
            config.snapshot_path = Some(dir.path().join("missing.html"));
        })
        .extract()
        .await;

        assert!(matches!(result, Err(ExtractError::NoCirculars)));
    }
}
