//! Utility modules supporting the extraction pipeline.
//!
//! - [`find_all_pdfs`]: Recursively discover PDF files in sorted order
//! - [`read_pdf_text`]: Extract text from the first pages of a PDF
//! - [`PdfExtractError`]: Errors that can occur during PDF extraction
//! - [`format_bib_entry`]: Render a [`crate::models::BibEntry`] as BibTeX
//! - [`ProgressReporter`]: Progress bar for a run over many files
//!
//! # BibTeX Formatting
//!
//! ```rust
//! use refmaker::models::BibEntry;
//! use refmaker::utils::format_bib_entry;
//!
//! let entry = BibEntry::new("article", "doe2020", "A Title", vec!["J. Doe".into()], 2020)
//!     .journal("Nature");
//! let bib = format_bib_entry(&entry);
//! assert!(bib.starts_with("@article{doe2020,"));
//! assert!(bib.ends_with("  journal = {Nature}\n}"));
//! ```

mod cite;
mod discover;
mod http;
mod pdf;
mod progress;

pub use cite::{bib_error_comment, bib_summary_comments, format_bib_entry, BIB_HEADER};
pub use discover::find_all_pdfs;
pub use http::build_client;
pub use pdf::{read_pdf_text, PageLimit, PdfExtractError};
pub use progress::ProgressReporter;
