//! BibTeX rendering for [`BibEntry`] records and the comment blocks that
//! surround them in the bibliography file.
//!
//! No escaping of BibTeX special characters (`{`, `}`, `%`, `&`) is done.
//! Output is best-effort text, not guaranteed parser input.

use crate::models::BibEntry;
use std::fmt::Display;
use std::path::Path;

/// Header written once at the top of the bibliography file
pub const BIB_HEADER: &str =
    "% Generated bibliography from PDF extraction\n% Each entry includes a summary comment\n\n";

/// Format a BibTeX entry
/// Format: @type{key,
///   title = {Title},
///   author = {A and B},
///   year = {Year},
///   journal = {Journal}
/// }
///
/// Fields are emitted in a fixed order and only when non-empty. `journal`
/// wins over `booktitle`; the two never appear together.
pub fn format_bib_entry(entry: &BibEntry) -> String {
    let mut lines = vec![format!("@{}{{{},", entry.entry_type, entry.key)];

    push_field(&mut lines, "title", &entry.title);
    push_field(&mut lines, "author", &entry.authors.join(" and "));
    if entry.year != 0 {
        push_field(&mut lines, "year", &entry.year.to_string());
    }

    if !entry.journal.is_empty() {
        push_field(&mut lines, "journal", &entry.journal);
    } else {
        push_field(&mut lines, "booktitle", &entry.booktitle);
    }

    push_field(&mut lines, "volume", &entry.volume);
    push_field(&mut lines, "number", &entry.number);
    push_field(&mut lines, "pages", &entry.pages);
    push_field(&mut lines, "publisher", &entry.publisher);
    push_field(&mut lines, "doi", &entry.doi);
    push_field(&mut lines, "url", &entry.url);

    if let Some(last) = lines.last_mut() {
        if last.ends_with(',') {
            last.pop();
        }
    }
    lines.push("}".to_string());

    lines.join("\n")
}

fn push_field(lines: &mut Vec<String>, name: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("  {} = {{{}}},", name, value));
    }
}

/// Summary and source comments written after a successful entry
pub fn bib_summary_comments(summary: &str, source: &Path) -> String {
    format!(
        "% Summary: {}\n% Source file: {}\n\n",
        summary,
        source.display()
    )
}

/// Comment pair written in place of an entry that could not be generated
pub fn bib_error_comment(title: &str, error: &dyn Display) -> String {
    format!("% Error generating entry for: {}\n% {}\n\n", title, error)
}
