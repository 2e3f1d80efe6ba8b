//! Structured listing decoding

use crate::app::models::{ListingItem, RawCircular};
use crate::errors::ExtractResult;

/// Decode the listing API body into raw circulars
///
/// # Errors
///
/// Returns `ExtractError::Decode` if the body is not a JSON array of listing
/// items.
pub fn decode_listing(body: &[u8]) -> ExtractResult<Vec<RawCircular>> {
    let items: Vec<ListingItem> = serde_json::from_slice(body)?;
    Ok(items.into_iter().map(RawCircular::from).collect())
}
