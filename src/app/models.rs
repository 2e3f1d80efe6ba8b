//! Data models for Circular Fetcher
//!
//! This module defines the manifest record ([`CircularRecord`]), the typed
//! listing item decoded from the structured API ([`ListingItem`]), and the
//! normalization shared by every extraction path ([`RawCircular`]).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

/// Reason a record failed in the download phase, as persisted in `download_error`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFailure {
    /// The record has no document URL
    NoUrl,
    /// Transport failure, non-200 status, or the body could not be written
    DownloadFailed,
    /// The downloaded body does not carry the PDF signature
    InvalidPdf,
}

impl DownloadFailure {
    /// The string stored in the manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoUrl => "No PDF URL",
            Self::DownloadFailed => "Download failed",
            Self::InvalidPdf => "Invalid pdf",
        }
    }
}

impl fmt::Display for DownloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Download status of a record as seen by the `status` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// Never processed by the download phase
    Pending,
    /// Downloaded and validated, now or in an earlier run
    Downloaded,
    /// Failed in the most recent run that touched it
    Failed,
}

/// One circular in the manifest
///
/// The descriptive fields and `pdf_url`/`file_name`/`local_path` are written
/// by the extractor. The optional fields belong to the download phase and are
/// omitted from the JSON until it sets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub ref_no: String,
    #[serde(default)]
    pub pdf_url: String,
    #[serde(default)]
    pub file_size: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub local_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_error: Option<String>,
}

impl CircularRecord {
    /// Whether the record is marked as downloaded
    pub fn is_downloaded(&self) -> bool {
        self.downloaded.unwrap_or(false)
    }

    /// Current status derived from the download fields
    pub fn status(&self) -> RecordStatus {
        match (self.downloaded, &self.download_error) {
            (Some(true), _) => RecordStatus::Downloaded,
            (Some(false), _) | (None, Some(_)) => RecordStatus::Failed,
            (None, None) => RecordStatus::Pending,
        }
    }

    /// Where the document lives on disk
    ///
    /// Falls back to `output_dir` plus the file name when `local_path` is
    /// missing from a hand-edited manifest.
    pub fn target_path(&self, output_dir: &Path) -> PathBuf {
        if !self.local_path.is_empty() {
            return PathBuf::from(&self.local_path);
        }

        let file_name = if self.file_name.is_empty() {
            derive_file_name(&self.pdf_url)
        } else {
            self.file_name.clone()
        };
        output_dir.join(file_name)
    }

    /// Record a successful download or an already valid local file
    ///
    /// `file_size_bytes` is only replaced when a size is supplied.
    pub fn mark_downloaded(&mut self, timestamp: String, file_size_bytes: Option<u64>) {
        self.downloaded = Some(true);
        self.download_time = Some(timestamp);
        if file_size_bytes.is_some() {
            self.file_size_bytes = file_size_bytes;
        }
        self.download_error = None;
    }

    /// Record a failed download
    pub fn mark_failed(&mut self, failure: DownloadFailure) {
        self.downloaded = Some(false);
        self.download_error = Some(failure.as_str().to_string());
    }
}

/// One item of the structured listing API
///
/// Every field is optional in the wire format; missing or `null` fields
/// decode to the empty string. Values of any other JSON type fail the whole
/// decode, which sends the extractor to its HTML fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingItem {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(rename = "documentDate", deserialize_with = "null_as_empty")]
    pub document_date: String,
    #[serde(rename = "refNo", deserialize_with = "null_as_empty")]
    pub ref_no: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub link: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub filesize: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Descriptive fields of a circular before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCircular {
    pub title: String,
    pub date: String,
    pub ref_no: String,
    pub link: String,
    pub file_size: String,
}

impl From<ListingItem> for RawCircular {
    fn from(item: ListingItem) -> Self {
        Self {
            title: item.title,
            date: item.document_date,
            ref_no: item.ref_no,
            link: item.link,
            file_size: item.filesize,
        }
    }
}

impl RawCircular {
    /// Normalize into a manifest record
    ///
    /// Trims every text field, resolves the link against `base_url` and
    /// derives `file_name` and `local_path`. Returns `None` when the link is
    /// empty after trimming.
    pub fn into_record(self, base_url: &str, output_dir: &Path) -> Option<CircularRecord> {
        let link = self.link.trim();
        if link.is_empty() {
            return None;
        }

        let pdf_url = resolve_link(link, base_url);
        let file_name = derive_file_name(&pdf_url);
        let local_path = output_dir.join(&file_name).to_string_lossy().into_owned();

        Some(CircularRecord {
            title: self.title.trim().to_string(),
            date: self.date.trim().to_string(),
            ref_no: self.ref_no.trim().to_string(),
            pdf_url,
            file_size: self.file_size.trim().to_string(),
            file_name,
            local_path,
            downloaded: None,
            download_time: None,
            file_size_bytes: None,
            download_error: None,
        })
    }
}

/// Complete a document link against the site origin
///
/// Links starting with `http` are kept as they are; anything else is joined
/// to `base_url` with exactly one separating slash.
pub fn resolve_link(link: &str, base_url: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}

/// File name for a document URL
///
/// The last path segment of the URL with every run of whitespace replaced
/// by a single underscore.
pub fn derive_file_name(pdf_url: &str) -> String {
    let basename = pdf_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let mut file_name = String::with_capacity(basename.len());
    let mut in_whitespace = false;
    for c in basename.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                file_name.push('_');
            }
            in_whitespace = true;
        } else {
            file_name.push(c);
            in_whitespace = false;
        }
    }
    file_name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(link: &str) -> RawCircular {
        RawCircular {
            title: "  Guidelines on Cash Withdrawal ".to_string(),
            date: " 2023-12-06 ".to_string(),
            ref_no: " BSD/DIR/PUB/LAB/016/008 ".to_string(),
            link: link.to_string(),
            file_size: " 245 KB ".to_string(),
        }
    }

    #[test]
    fn test_derive_file_name_collapses_whitespace() {
        assert_eq!(
            derive_file_name("https://www.cbn.gov.ng/Out/2023/CCD/Circular on  Cash\tWithdrawal.pdf"),
            "Circular_on_Cash_Withdrawal.pdf"
        );
        assert_eq!(derive_file_name("https://example.com/a/plain.pdf"), "plain.pdf");
        assert_eq!(derive_file_name("https://example.com/dir/"), "dir");
    }

    #[test]
    fn test_resolve_link() {
        let base = "https://www.cbn.gov.ng";
        assert_eq!(
            resolve_link("/Out/2023/a.pdf", base),
            "https://www.cbn.gov.ng/Out/2023/a.pdf"
        );
        assert_eq!(
            resolve_link("Out/2023/a.pdf", "https://www.cbn.gov.ng/"),
            "https://www.cbn.gov.ng/Out/2023/a.pdf"
        );
        assert_eq!(
            resolve_link("http://mirror.example.com/a.pdf", base),
            "http://mirror.example.com/a.pdf"
        );
    }

    #[test]
    fn test_into_record_normalizes_fields() {
        let record = raw(" /Out/2023/CCD/Cash Withdrawal.pdf ")
            .into_record("https://www.cbn.gov.ng", Path::new("pdf_downloads/"))
            .unwrap();

        assert_eq!(record.title, "Guidelines on Cash Withdrawal");
        assert_eq!(record.date, "2023-12-06");
        assert_eq!(record.ref_no, "BSD/DIR/PUB/LAB/016/008");
        assert_eq!(record.file_size, "245 KB");
        assert_eq!(
            record.pdf_url,
            "https://www.cbn.gov.ng/Out/2023/CCD/Cash Withdrawal.pdf"
        );
        assert_eq!(record.file_name, "Cash_Withdrawal.pdf");
        assert_eq!(record.local_path, "pdf_downloads/Cash_Withdrawal.pdf");
        assert_eq!(record.status(), RecordStatus::Pending);
    }

    #[test]
    fn test_into_record_drops_empty_link() {
        assert!(raw("   ")
            .into_record("https://www.cbn.gov.ng", Path::new("pdf_downloads/"))
            .is_none());
    }

    #[test]
    fn test_listing_item_defaults_missing_fields() {
        let item: ListingItem =
            serde_json::from_str(r#"{"title": "Notice", "link": "/a.pdf"}"#).unwrap();
        assert_eq!(item.title, "Notice");
        assert_eq!(item.link, "/a.pdf");
        assert_eq!(item.document_date, "");
        assert_eq!(item.ref_no, "");
        assert_eq!(item.filesize, "");
    }

    #[test]
    fn test_listing_item_null_and_wrong_types() {
        let item: ListingItem =
            serde_json::from_str(r#"{"title": null, "refNo": null, "link": "/a.pdf"}"#).unwrap();
        assert_eq!(item.title, "");
        assert_eq!(item.ref_no, "");

        assert!(serde_json::from_str::<ListingItem>(r#"{"title": 42}"#).is_err());
    }

    #[test]
    fn test_record_serialization_omits_unset_download_fields() {
        let record = raw("/a.pdf")
            .into_record("https://www.cbn.gov.ng", Path::new("pdf_downloads/"))
            .unwrap();
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains(r#""pdf_url":"https://www.cbn.gov.ng/a.pdf""#));
        assert!(!json.contains("downloaded"));
        assert!(!json.contains("download_error"));
    }

    #[test]
    fn test_mark_transitions() {
        let mut record = raw("/a.pdf")
            .into_record("https://www.cbn.gov.ng", Path::new("out"))
            .unwrap();

        record.mark_failed(DownloadFailure::InvalidPdf);
        assert_eq!(record.status(), RecordStatus::Failed);
        assert_eq!(record.download_error.as_deref(), Some("Invalid pdf"));

        record.mark_downloaded("2024-01-01 10:00:00".to_string(), Some(1024));
        assert_eq!(record.status(), RecordStatus::Downloaded);
        assert!(record.download_error.is_none());
        assert_eq!(record.file_size_bytes, Some(1024));

        record.mark_downloaded("2024-01-02 10:00:00".to_string(), None);
        assert_eq!(record.file_size_bytes, Some(1024));
    }

    #[test]
    fn test_target_path_fallback() {
        let record = CircularRecord {
            title: String::new(),
            date: String::new(),
            ref_no: String::new(),
            pdf_url: "https://example.com/x y.pdf".to_string(),
            file_size: String::new(),
            file_name: String::new(),
            local_path: String::new(),
            downloaded: None,
            download_time: None,
            file_size_bytes: None,
            download_error: None,
        };
        assert_eq!(
            record.target_path(Path::new("out")),
            PathBuf::from("out").join("x_y.pdf")
        );
    }
}
