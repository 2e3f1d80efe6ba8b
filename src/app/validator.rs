//! PDF signature verification
//!
//! The download phase never trusts manifest state on its own: a file counts
//! as present only if its leading bytes carry the PDF signature.

use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::constants::pdf;

/// Signature-based document verification
pub struct PdfValidator;

impl PdfValidator {
    /// Check whether the file at `path` starts with the PDF signature
    ///
    /// Fails closed: a missing path, a directory, an unreadable file or a
    /// file shorter than the signature all report `false`. Only the first
    /// four bytes are read.
    pub async fn is_valid_pdf(path: &Path) -> bool {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(_) => return false,
        };

        if !metadata.is_file() || metadata.len() < pdf::MAGIC.len() as u64 {
            debug!("{} is missing or too short for a PDF", path.display());
            return false;
        }

        let mut file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                debug!("Cannot open {} for signature check: {}", path.display(), e);
                return false;
            }
        };

        let mut signature = [0_u8; 4];
        match file.read_exact(&mut signature).await {
            Ok(_) => Self::has_pdf_signature(&signature),
            Err(_) => false,
        }
    }

    /// Check whether an in-memory body starts with the PDF signature
    pub fn has_pdf_signature(bytes: &[u8]) -> bool {
        bytes.starts_with(pdf::MAGIC)
    }
}
