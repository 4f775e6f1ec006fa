//! PDF text extraction utilities.
//!
//! Text is pulled page by page with lopdf so callers can limit extraction to
//! the first few pages of a paper, where title, authors and DOI live.

use lopdf::Document;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("Failed to open PDF {path}: {message}")]
    Open { path: String, message: String },
}

/// How many pages to read from a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLimit {
    /// Every page in the document
    #[default]
    All,
    /// At most the first `n` pages
    First(usize),
}

impl PageLimit {
    /// Number of pages to read from a document with `total` pages
    pub fn pages_to_read(self, total: usize) -> usize {
        match self {
            PageLimit::All => total,
            PageLimit::First(n) => n.min(total),
        }
    }
}

fn open(path: &Path) -> Result<Document, PdfExtractError> {
    if !path.is_file() {
        return Err(PdfExtractError::InvalidFile(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    Document::load(path).map_err(|e| PdfExtractError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Extract text from the first pages of a PDF file.
///
/// Pages are read in order and joined with `\n`. A page whose content cannot
/// be decoded contributes an empty string; only a document that cannot be
/// opened at all is an error. The document is dropped before returning.
///
/// # Examples
///
/// ```ignore
/// let text = read_pdf_text(Path::new("paper.pdf"), PageLimit::First(3))?;
/// println!("Extracted {} characters", text.len());
/// ```
pub fn read_pdf_text(path: &Path, limit: PageLimit) -> Result<String, PdfExtractError> {
    let doc = open(path)?;
    let pages = doc.get_pages();
    let to_read = limit.pages_to_read(pages.len());
    tracing::debug!(
        "Reading {} of {} pages from {}",
        to_read,
        pages.len(),
        path.display()
    );

    let text: Vec<String> = pages
        .keys()
        .take(to_read)
        .map(|&page_number| match doc.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "Could not extract text from page {} of {}: {}",
                    page_number,
                    path.display(),
                    e
                );
                String::new()
            }
        })
        .collect();

    if text.iter().all(|t| t.trim().is_empty()) {
        // Scanned or image-only PDFs end up here
        tracing::debug!("Extracted empty text from PDF: {}", path.display());
    }

    Ok(text.join("\n"))
}
