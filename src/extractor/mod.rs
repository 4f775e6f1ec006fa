//! AI-backed extraction of paper metadata, citations and summaries.
//!
//! This module defines the [`PaperExtractor`] trait the pipeline drives. The
//! production implementation is [`OpenAiExtractor`], which asks an
//! OpenAI-compatible chat completion endpoint for JSON matching a declared
//! schema and coerces the reply into the typed records in
//! [`crate::models`]. [`MockExtractor`] is a deterministic stand-in for
//! tests.
//!
//! Implementations never retry. A failed request or a reply that does not
//! fit the schema comes back as an [`ExtractionError`].

pub mod mock;
mod openai;
pub mod prompt;

pub use mock::MockExtractor;
pub use openai::OpenAiExtractor;

use crate::models::{BibEntry, PaperInfo};
use async_trait::async_trait;

/// The capabilities the pipeline needs from a language model.
#[async_trait]
pub trait PaperExtractor: Send + Sync {
    /// Pull title, authors, year and DOI out of raw paper text
    async fn extract_paper_info(&self, text: &str) -> Result<PaperInfo, ExtractionError>;

    /// Produce a citation record, preferring the publisher's official one
    async fn generate_bib_entry(&self, info: &PaperInfo) -> Result<BibEntry, ExtractionError>;

    /// Produce a 2-3 sentence summary from the paper text
    async fn generate_summary(&self, text: &str) -> Result<String, ExtractionError>;
}

/// Errors that can occur while talking to the extraction model
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Network or HTTP error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the completion endpoint
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The reply carried no usable message
    #[error("API returned empty response")]
    EmptyResponse,

    /// The model declined to answer
    #[error("Model refused the request: {0}")]
    Refusal(String),

    /// The reply could not be coerced into the requested record
    #[error("Response does not match the {schema} schema: {message}")]
    Schema {
        schema: &'static str,
        message: String,
    },

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Any other extraction failure
    #[error("{0}")]
    Other(String),
}
