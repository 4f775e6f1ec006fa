//! Prompts and response schemas for the three extraction tasks.

use crate::models::PaperInfo;
use serde_json::{json, Value};

/// Default number of characters of paper text sent for summarization
pub const SUMMARY_CHAR_LIMIT: usize = 4000;

/// Prompt asking for title, authors, year and DOI
pub fn paper_info_prompt(text: &str) -> String {
    format!(
        "Extract title, authors, year, and DOI from the following text:\n\n{}",
        text
    )
}

/// Prompt asking for the paper's official citation
pub fn bib_entry_prompt(info: &PaperInfo) -> String {
    format!(
        r#"CRITICAL: You MUST search online and find the OFFICIAL BibTeX citation for this paper. This is the highest priority approach.

Paper Information:
Title: {title}
Authors: {authors}
Year: {year}
DOI: {doi}

SEARCH STRATEGY (in order of preference):
1. PRIMARY GOAL: Find and use the OFFICIAL BibTeX citation from the paper's publisher website
   - Search publisher sites (IEEE, ACM, Springer, Elsevier, etc.)
   - Look for "Cite this paper" or "Export citation" buttons
   - Use the official BibTeX entry provided by the publisher
2. SECONDARY: Search academic databases (Google Scholar, DBLP, arXiv, PubMed, etc.)
   - Use the exact citation format they provide
3. IF DOI EXISTS: Use the DOI to find the official publication page and its BibTeX
4. LAST RESORT: Only if no official citation exists, construct one with accurate details

REQUIREMENTS:
- Prefer the official publisher BibTeX over manual construction
- If you find an official BibTeX, use it exactly as provided, including its citation key
- Use the entry type found in the official citation (article, inproceedings, book, etc.)
- Include all fields present in the official BibTeX
- Only if necessary, use the citation key format firstauthorlastname{year}
- Preserve publisher metadata such as page ranges and volume/issue numbers
- Leave a field as an empty string when it does not apply"#,
        title = info.title,
        authors = info.author_line(),
        year = info.year,
        doi = info.doi,
    )
}

/// Prompt asking for a short summary of at most `char_limit` characters of text
pub fn summary_prompt(text: &str, char_limit: usize) -> String {
    format!(
        r#"Based on the following paper text, generate a concise 2-3 sentence summary that captures:
1. The main research objective/problem addressed
2. The key methodology or approach used
3. The main findings or contributions

Text content:
{}..."#,
        truncate_chars(text, char_limit)
    )
}

/// The first `limit` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// JSON schema for [`PaperInfo`]
pub fn paper_info_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "authors": { "type": "array", "items": { "type": "string" } },
            "year": { "type": "integer" },
            "DOI": { "type": "string" }
        },
        "required": ["title", "authors", "year", "DOI"],
        "additionalProperties": false
    })
}

/// JSON schema for [`crate::models::BibEntry`]
pub fn bib_entry_schema() -> Value {
    let optional = [
        "journal",
        "booktitle",
        "volume",
        "number",
        "pages",
        "publisher",
        "doi",
        "url",
    ];

    let mut properties = json!({
        "entry_type": { "type": "string" },
        "key": { "type": "string" },
        "title": { "type": "string" },
        "authors": { "type": "array", "items": { "type": "string" } },
        "year": { "type": "integer" }
    });
    let mut required = vec!["entry_type", "key", "title", "authors", "year"];
    for field in optional {
        properties[field] = json!({ "type": "string" });
        required.push(field);
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// JSON schema for [`crate::models::PaperSummary`]
pub fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" }
        },
        "required": ["summary"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_summary_prompt_sends_at_most_limit() {
        let text = "Z".repeat(SUMMARY_CHAR_LIMIT + 500);
        let prompt = summary_prompt(&text, SUMMARY_CHAR_LIMIT);
        let sent = prompt.matches('Z').count();
        assert_eq!(sent, SUMMARY_CHAR_LIMIT);
        assert!(prompt.ends_with("..."));
    }

    #[test]
    fn test_bib_entry_prompt_includes_metadata() {
        let info = PaperInfo::new("Deep Nets", vec!["A. Smith".into(), "B. Lee".into()], 2019, "10.1/dn");
        let prompt = bib_entry_prompt(&info);
        assert!(prompt.contains("Title: Deep Nets"));
        assert!(prompt.contains("Authors: A. Smith, B. Lee"));
        assert!(prompt.contains("Year: 2019"));
        assert!(prompt.contains("DOI: 10.1/dn"));
        assert!(prompt.contains("firstauthorlastname2019"));
        assert!(prompt.contains("OFFICIAL BibTeX"));
    }

    #[test]
    fn test_bib_entry_schema_requires_every_field() {
        let schema = bib_entry_schema();
        let required = schema["required"].as_array().unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(required.len(), 13);
        assert_eq!(properties.len(), 13);
        assert_eq!(properties["year"]["type"], "integer");
        assert_eq!(properties["url"]["type"], "string");
    }

    #[test]
    fn test_paper_info_schema_uses_doi_wire_name() {
        let schema = paper_info_schema();
        assert!(schema["properties"].get("DOI").is_some());
    }
}
