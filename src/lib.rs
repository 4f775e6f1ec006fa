//! # refmaker
//!
//! Scan a directory for PDF papers, extract bibliographic metadata and a
//! short summary for each with a language model, and write a plain-text
//! report plus a BibTeX bibliography.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Paper metadata, citation and summary records
//! - [`extractor`]: The [`PaperExtractor`] trait and its OpenAI backend
//! - [`pipeline`]: The per-directory run that ties everything together
//! - [`utils`]: PDF discovery and text extraction, BibTeX formatting
//! - [`config`]: Configuration management

pub mod config;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use extractor::{ExtractionError, PaperExtractor};
pub use models::{BibEntry, PaperInfo};
pub use pipeline::{Pipeline, PipelineError, RunSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
