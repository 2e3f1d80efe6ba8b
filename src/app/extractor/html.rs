//! Structural parsing of the rendered listing page
//!
//! The data grid is read through [`StructuralQuery`], which reduces a parsed
//! document to plain [`TableRow`] values. Row interpretation in
//! [`rows_to_circulars`] never sees the HTML tree, so it can be exercised
//! against fixed rows.

use scraper::{ElementRef, Html, Selector};

use crate::app::models::RawCircular;
use crate::constants::selectors;
use crate::errors::{ExtractError, ExtractResult};

/// Link found in a table cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellLink {
    /// Raw `href` attribute
    pub href: String,
    /// Link text with whitespace normalized
    pub text: String,
}

/// One table cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    /// Cell text with whitespace normalized
    pub text: String,
    /// First link inside the cell, if any
    pub link: Option<CellLink>,
}

/// One table row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// Narrow query capability over a parsed document
pub trait StructuralQuery {
    /// Select the rows matching `row_selector` and break each into cells
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::InvalidSelector` if the selector does not parse.
    fn select_rows(&self, row_selector: &str) -> ExtractResult<Vec<TableRow>>;
}

/// HTML document parsed with `scraper`
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse a full HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl StructuralQuery for HtmlDocument {
    fn select_rows(&self, row_selector: &str) -> ExtractResult<Vec<TableRow>> {
        let row_selector = parse_selector(row_selector)?;
        let cell_selector = parse_selector(selectors::CELL_SELECTOR)?;
        let link_selector = parse_selector(selectors::LINK_SELECTOR)?;

        let rows = self
            .html
            .select(&row_selector)
            .map(|row| TableRow {
                cells: row
                    .select(&cell_selector)
                    .map(|cell| TableCell {
                        text: element_text(&cell),
                        link: cell.select(&link_selector).next().map(|a| CellLink {
                            href: a.value().attr("href").unwrap_or_default().to_string(),
                            text: element_text(&a),
                        }),
                    })
                    .collect(),
            })
            .collect();

        Ok(rows)
    }
}

fn parse_selector(selector: &str) -> ExtractResult<Selector> {
    Selector::parse(selector).map_err(|_| ExtractError::InvalidSelector {
        selector: selector.to_string(),
    })
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Interpret data grid rows positionally
///
/// Cell 0 is the reference number, cell 1 holds the document link (its text
/// is the title), cell 2 is the date and the optional cell 3 is the size.
/// Rows with fewer than three cells (headers, spacers) or without a link are
/// skipped.
pub fn rows_to_circulars(rows: Vec<TableRow>) -> Vec<RawCircular> {
    rows.into_iter()
        .filter_map(|row| {
            if row.cells.len() < 3 {
                return None;
            }

            let mut cells = row.cells.into_iter();
            let ref_cell = cells.next()?;
            let link_cell = cells.next()?;
            let date_cell = cells.next()?;
            let size_cell = cells.next();

            let link = link_cell.link.filter(|l| !l.href.trim().is_empty())?;

            Some(RawCircular {
                title: link.text,
                date: date_cell.text,
                ref_no: ref_cell.text,
                link: link.href,
                file_size: size_cell.map(|c| c.text).unwrap_or_default(),
            })
        })
        .collect()
}

/// Select and interpret the rows of a document
pub fn extract_rows<Q>(document: &Q, row_selector: &str) -> ExtractResult<Vec<RawCircular>>
where
    Q: StructuralQuery + ?Sized,
{
    Ok(rows_to_circulars(document.select_rows(row_selector)?))
}
