//! Paper models produced from a single PDF during a run.

use serde::{Deserialize, Serialize};

/// Bibliographic metadata read out of a paper's first pages.
///
/// Nothing here is checked against the document; the values are whatever the
/// extraction model returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperInfo {
    /// Paper title
    pub title: String,

    /// Authors in the order they appear on the paper
    pub authors: Vec<String>,

    /// Publication year
    pub year: i32,

    /// Digital Object Identifier (may be empty)
    #[serde(rename = "DOI")]
    pub doi: String,
}

impl PaperInfo {
    /// Create a new paper info record
    pub fn new(
        title: impl Into<String>,
        authors: Vec<String>,
        year: i32,
        doi: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors,
            year,
            doi: doi.into(),
        }
    }

    /// Authors joined with `", "`
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// The four-line block written to the report and echoed to the log.
    pub fn report_block(&self) -> String {
        format!(
            "Title: {}\nAuthors: {}\nYear: {}\nDOI: {}",
            self.title,
            self.author_line(),
            self.year,
            self.doi
        )
    }
}

/// A structured citation record, rendered by [`crate::utils::format_bib_entry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
    /// BibTeX entry type (`article`, `inproceedings`, `book`, ...)
    pub entry_type: String,

    /// Citation key
    pub key: String,

    pub title: String,

    pub authors: Vec<String>,

    pub year: i32,

    #[serde(default)]
    pub journal: String,

    #[serde(default)]
    pub booktitle: String,

    #[serde(default)]
    pub volume: String,

    #[serde(default)]
    pub number: String,

    #[serde(default)]
    pub pages: String,

    #[serde(default)]
    pub publisher: String,

    #[serde(default)]
    pub doi: String,

    #[serde(default)]
    pub url: String,
}

impl BibEntry {
    /// Create an entry with the required fields; optional fields start empty.
    pub fn new(
        entry_type: impl Into<String>,
        key: impl Into<String>,
        title: impl Into<String>,
        authors: Vec<String>,
        year: i32,
    ) -> Self {
        Self {
            entry_type: entry_type.into(),
            key: key.into(),
            title: title.into(),
            authors,
            year,
            ..Default::default()
        }
    }

    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = journal.into();
        self
    }

    pub fn booktitle(mut self, booktitle: impl Into<String>) -> Self {
        self.booktitle = booktitle.into();
        self
    }

    pub fn volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = volume.into();
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = pages.into();
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = doi.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Short prose summary of a paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_info_doi_wire_name() {
        let info: PaperInfo = serde_json::from_str(
            r#"{"title":"X","authors":["A","B"],"year":2020,"DOI":"10.1/x"}"#,
        )
        .unwrap();
        assert_eq!(info.doi, "10.1/x");

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["DOI"], "10.1/x");
        assert!(json.get("doi").is_none());
    }

    #[test]
    fn test_paper_info_missing_field_is_rejected() {
        let result: Result<PaperInfo, _> =
            serde_json::from_str(r#"{"title":"X","authors":["A"],"DOI":""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_paper_info_report_block() {
        let info = PaperInfo::new("X", vec!["A".into(), "B".into()], 2020, "10.1/x");
        assert_eq!(
            info.report_block(),
            "Title: X\nAuthors: A, B\nYear: 2020\nDOI: 10.1/x"
        );
    }

    #[test]
    fn test_bib_entry_optional_fields_default_empty() {
        let entry: BibEntry = serde_json::from_str(
            r#"{"entry_type":"article","key":"a2020","title":"X","authors":["A"],"year":2020,"journal":"J"}"#,
        )
        .unwrap();
        assert_eq!(entry.journal, "J");
        assert!(entry.booktitle.is_empty());
        assert!(entry.url.is_empty());
    }
}
