//! Circular Fetcher Library
//!
//! A Rust library for harvesting the Central Bank of Nigeria circular listing
//! into a JSON manifest and downloading the referenced PDF documents with
//! resumable, validated progress.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(CHECKPOINT_INTERVAL, 5);
        assert_eq!(MANIFEST_FILE_NAME, "cbn_circulars.json");
        assert_eq!(PDF_MAGIC, b"%PDF");
        assert!(API_URL.starts_with(BASE_URL));
    }

    #[test]
    fn test_error_types() {
        let app_error = AppError::Extract(errors::ExtractError::NoCirculars);
        assert_eq!(app_error.category(), "content");
        assert_eq!(app_error.to_string(), "No circulars found in the listing");
    }
}
