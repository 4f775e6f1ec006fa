//! Mock extractor for testing purposes.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::extractor::{ExtractionError, PaperExtractor};
use crate::models::{BibEntry, PaperInfo};

/// A mock extractor that returns predefined responses.
///
/// Without configured responses it derives deterministic records from its
/// input: the first non-empty line of the text becomes the title.
#[derive(Debug, Default)]
pub struct MockExtractor {
    paper_info: Mutex<Option<PaperInfo>>,
    failing_titles: Mutex<HashSet<String>>,
    failing_summaries: Mutex<HashSet<String>>,
    fail_info: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl MockExtractor {
    /// Create a new mock extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `info` from every `extract_paper_info` call.
    pub fn set_paper_info(&self, info: PaperInfo) {
        *self.paper_info.lock().unwrap() = Some(info);
    }

    /// Make `generate_bib_entry` fail for papers with this title.
    pub fn fail_bib_for(&self, title: impl Into<String>) {
        self.failing_titles.lock().unwrap().insert(title.into());
    }

    /// Make `generate_summary` fail for text whose first line is `title`.
    pub fn fail_summary_for(&self, title: impl Into<String>) {
        self.failing_summaries.lock().unwrap().insert(title.into());
    }

    /// Make every `extract_paper_info` call fail.
    pub fn fail_paper_info(&self) {
        *self.fail_info.lock().unwrap() = true;
    }

    /// Names of the calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl PaperExtractor for MockExtractor {
    async fn extract_paper_info(&self, text: &str) -> Result<PaperInfo, ExtractionError> {
        self.record("extract_paper_info");
        if *self.fail_info.lock().unwrap() {
            return Err(ExtractionError::Schema {
                schema: "paper_info",
                message: "missing field `title`".to_string(),
            });
        }

        if let Some(info) = self.paper_info.lock().unwrap().clone() {
            return Ok(info);
        }

        Ok(PaperInfo::new(
            first_line(text),
            vec!["Mock Author".to_string()],
            2020,
            "",
        ))
    }

    async fn generate_bib_entry(&self, info: &PaperInfo) -> Result<BibEntry, ExtractionError> {
        self.record("generate_bib_entry");
        if self.failing_titles.lock().unwrap().contains(&info.title) {
            return Err(ExtractionError::Other(format!(
                "mock failure for {}",
                info.title
            )));
        }

        let key: String = info
            .title
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Ok(
            BibEntry::new("article", format!("{}{}", key, info.year), &info.title, info.authors.clone(), info.year)
                .journal("Mock Journal")
                .doi(&info.doi),
        )
    }

    async fn generate_summary(&self, text: &str) -> Result<String, ExtractionError> {
        self.record("generate_summary");
        let title = first_line(text);
        if self.failing_summaries.lock().unwrap().contains(title) {
            return Err(ExtractionError::Api {
                status: 503,
                message: format!("summary unavailable for {}", title),
            });
        }
        Ok(format!("Summary of {} characters.", text.chars().count()))
    }
}

fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Untitled")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_derives_title_from_text() {
        let mock = MockExtractor::new();
        let info = mock.extract_paper_info("\n  Hello Paper \nbody").await.unwrap();
        assert_eq!(info.title, "Hello Paper");

        let entry = mock.generate_bib_entry(&info).await.unwrap();
        assert_eq!(entry.key, "hellopaper2020");
        assert_eq!(entry.journal, "Mock Journal");
    }

    #[tokio::test]
    async fn test_configured_failures() {
        let mock = MockExtractor::new();
        mock.fail_bib_for("Bad");
        let bad = PaperInfo::new("Bad", Vec::new(), 2021, "");
        assert!(mock.generate_bib_entry(&bad).await.is_err());

        mock.fail_summary_for("Bad");
        assert!(mock.generate_summary("Bad\nbody").await.is_err());
        assert!(mock.generate_summary("Good\nbody").await.is_ok());

        mock.fail_paper_info();
        assert!(mock.extract_paper_info("text").await.is_err());
        assert_eq!(
            mock.calls(),
            vec![
                "generate_bib_entry",
                "generate_summary",
                "generate_summary",
                "extract_paper_info"
            ]
        );
    }
}
