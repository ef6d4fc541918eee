//! core::document
//!
//! The draft model and its deterministic serialization.
//!
//! # Design
//!
//! A [`Draft`] keeps its metadata as separate fields rather than as a single
//! mutable text buffer. Re-rendering after any field edit regenerates the
//! whole front matter block from structure; there is no find-and-patch of a
//! metadata region inside free text.
//!
//! [`render`] is a pure function: identical drafts yield byte-identical
//! output, and changing only the body leaves the metadata block unchanged.
//!
//! # Format
//!
//! ```text
//! +++
//! title = "<title>"
//! date = <YYYY-MM-DD>
//! authors = ["<author>"]     (only when the author is non-empty)
//! +++
//!
//! <body verbatim>
//! ```
//!
//! Fixed key order, one blank line after the closing sentinel, nothing
//! appended after the body.

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::core::types::DraftId;

/// The front matter delimiter line.
const SENTINEL: &str = "+++";

/// Errors from document rendering.
///
/// Double quotes, backslashes, and control characters in metadata fields
/// are rejected rather than escaped: a corrupted front matter block is
/// worse than asking the user to rephrase.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("title cannot contain quotes, backslashes, or line breaks")]
    InvalidTitle,

    #[error("author cannot contain quotes, backslashes, or line breaks")]
    InvalidAuthor,
}

/// An in-progress, not-yet-published post.
///
/// Created when the user opens the composer and mutated in place by edits
/// until a publish attempt consumes it. Not persisted between sessions.
///
/// The `date` is set at creation time and never user-edited. An empty
/// `author` means "no author line". The `filename` carries no extension;
/// `.md` is appended when the destination is resolved.
#[derive(Debug, Clone)]
pub struct Draft {
    id: DraftId,
    /// Post title. Empty until the user edits the placeholder.
    pub title: String,
    /// Creation-time local date, day precision.
    pub date: NaiveDate,
    /// Optional author; empty means absent.
    pub author: String,
    /// Raw markup body, emitted verbatim below the front matter.
    pub body: String,
    /// Target filename without extension.
    pub filename: String,
}

impl Draft {
    /// Create an empty draft dated `date`.
    ///
    /// The UI collaborator supplies "today" so the core stays clock-free.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: DraftId::new(),
            title: String::new(),
            date,
            author: String::new(),
            body: String::new(),
            filename: String::new(),
        }
    }

    /// Create an empty draft dated with the local calendar date.
    pub fn created_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// Identity of this draft instance. Survives `Clone`.
    pub fn id(&self) -> DraftId {
        self.id
    }
}

/// Render a draft to its final file content.
///
/// Pure and deterministic: byte-identical output for identical input.
///
/// # Errors
///
/// Returns `RenderError` if the title or author contains characters that
/// cannot appear inside a quoted front matter string.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use postforge::core::document::{render, Draft};
///
/// let mut draft = Draft::new(NaiveDate::from_ymd_opt(2024, 11, 19).unwrap());
/// draft.title = "Hello".to_string();
/// draft.body = "Hi there".to_string();
///
/// let doc = render(&draft).unwrap();
/// assert_eq!(doc, "+++\ntitle = \"Hello\"\ndate = 2024-11-19\n+++\n\nHi there");
/// ```
pub fn render(draft: &Draft) -> Result<String, RenderError> {
    if !is_representable(&draft.title) {
        return Err(RenderError::InvalidTitle);
    }
    if !is_representable(&draft.author) {
        return Err(RenderError::InvalidAuthor);
    }

    let mut out = String::with_capacity(draft.body.len() + 64);
    out.push_str(SENTINEL);
    out.push('\n');
    out.push_str(&format!("title = \"{}\"\n", draft.title));
    out.push_str(&format!("date = {}\n", draft.date.format("%Y-%m-%d")));
    if !draft.author.is_empty() {
        out.push_str(&format!("authors = [\"{}\"]\n", draft.author));
    }
    out.push_str(SENTINEL);
    out.push('\n');
    out.push('\n');
    out.push_str(&draft.body);
    Ok(out)
}

/// Whether a value can sit inside a quoted front matter string unescaped.
fn is_representable(value: &str) -> bool {
    !value
        .chars()
        .any(|c| c == '"' || c == '\\' || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, author: &str, body: &str) -> Draft {
        let mut d = Draft::new(NaiveDate::from_ymd_opt(2024, 11, 19).unwrap());
        d.title = title.to_string();
        d.author = author.to_string();
        d.body = body.to_string();
        d
    }

    #[test]
    fn renders_minimal_document() {
        let doc = render(&draft("Hello", "", "Hi there")).unwrap();
        assert_eq!(doc, "+++\ntitle = \"Hello\"\ndate = 2024-11-19\n+++\n\nHi there");
    }

    #[test]
    fn author_adds_exactly_one_line() {
        let without = render(&draft("Hello", "", "Hi there")).unwrap();
        let with = render(&draft("Hello", "lin", "Hi there")).unwrap();

        let without_lines: Vec<&str> = without.lines().collect();
        let with_lines: Vec<&str> = with.lines().collect();
        assert_eq!(with_lines.len(), without_lines.len() + 1);
        assert_eq!(with_lines[3], "authors = [\"lin\"]");

        // No other line changes.
        assert_eq!(with_lines[..3], without_lines[..3]);
        assert_eq!(with_lines[4..], without_lines[3..]);
    }

    #[test]
    fn render_is_deterministic() {
        let a = render(&draft("Hello", "lin", "body text")).unwrap();
        let b = render(&draft("Hello", "lin", "body text")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn body_change_leaves_metadata_unchanged() {
        let a = render(&draft("Hello", "lin", "first body")).unwrap();
        let b = render(&draft("Hello", "lin", "second body")).unwrap();
        let metadata_a = &a[..a.len() - "first body".len()];
        let metadata_b = &b[..b.len() - "second body".len()];
        assert_eq!(metadata_a, metadata_b);
    }

    #[test]
    fn body_is_verbatim() {
        let body = "line one\n\n> quote with \"quotes\"\n";
        let doc = render(&draft("Hello", "", body)).unwrap();
        assert!(doc.ends_with(body));
    }

    #[test]
    fn empty_body_keeps_blank_line() {
        let doc = render(&draft("Hello", "", "")).unwrap();
        assert!(doc.ends_with("+++\n\n"));
    }

    #[test]
    fn quote_in_title_rejected() {
        let result = render(&draft("say \"hi\"", "", "body"));
        assert_eq!(result, Err(RenderError::InvalidTitle));
    }

    #[test]
    fn backslash_in_title_rejected() {
        assert_eq!(
            render(&draft("a\\b", "", "body")),
            Err(RenderError::InvalidTitle)
        );
    }

    #[test]
    fn newline_in_author_rejected() {
        assert_eq!(
            render(&draft("Hello", "a\nb", "body")),
            Err(RenderError::InvalidAuthor)
        );
    }

    #[test]
    fn clone_preserves_identity() {
        let original = draft("Hello", "", "body");
        let copy = original.clone();
        assert_eq!(original.id(), copy.id());
    }

    #[test]
    fn new_drafts_have_distinct_identity() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 19).unwrap();
        assert_ne!(Draft::new(date).id(), Draft::new(date).id());
    }
}
