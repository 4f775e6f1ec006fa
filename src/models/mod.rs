//! Core data models for papers and citations.

mod paper;

pub use paper::{BibEntry, PaperInfo, PaperSummary};
