//! Markdown conversion of split fragments.
//!
//! Conversion sits behind the [`MarkdownConverter`] trait so the engine is
//! swappable: the default [`PdfiumConverter`] extracts the embedded text
//! layer, but callers can inject anything that turns a PDF path into a
//! markdown string (an OCR backend, a remote service, a test fake).
//!
//! The trait is synchronous and object-safe; the split runner invokes it
//! from a blocking task, so implementations are free to do CPU-bound or
//! blocking I/O work directly.

use crate::error::ConvertError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

use once_cell::sync::Lazy;
use regex::Regex;

/// Turns one PDF file into a markdown string.
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, pdf_path: &Path) -> Result<String, ConvertError>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "converter"
    }
}

/// Default converter: pdfium text-layer extraction plus cleanup.
///
/// Produces one section per page separated by blank lines. Scanned
/// documents with no text layer yield [`ConvertError::NoText`] rather
/// than an empty file.
#[derive(Debug, Default)]
pub struct PdfiumConverter;

impl MarkdownConverter for PdfiumConverter {
    fn convert(&self, pdf_path: &Path) -> Result<String, ConvertError> {
        let pdfium = Pdfium::default();

        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| ConvertError::Unreadable {
                path: pdf_path.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        let mut sections = Vec::new();
        for page in document.pages().iter() {
            let text = page
                .text()
                .map_err(|e| ConvertError::Unreadable {
                    path: pdf_path.to_path_buf(),
                    detail: format!("{:?}", e),
                })?
                .all();

            if !text.trim().is_empty() {
                sections.push(text);
            }
        }

        if sections.is_empty() {
            return Err(ConvertError::NoText {
                path: pdf_path.to_path_buf(),
            });
        }

        debug!(
            "Extracted text from {} page(s) of {}",
            sections.len(),
            pdf_path.display()
        );

        Ok(cleanup(&sections.join("\n\n")))
    }

    fn name(&self) -> &str {
        "pdfium-text"
    }
}

// ── Text cleanup ─────────────────────────────────────────────────────────
//
// Extracted text arrives with artifacts of the PDF text layer: stray
// carriage returns, zero-width characters from ligature handling, ragged
// trailing whitespace and walls of blank lines. Each rule below is a pure
// string transform with its own test.

static RE_TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());
static RE_BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static RE_INVISIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{200B}\u{200C}\u{200D}\u{FEFF}\u{00AD}]").unwrap());

/// Run every cleanup rule over extracted text.
pub fn cleanup(text: &str) -> String {
    let text = normalize_line_endings(text);
    let text = strip_invisible_chars(&text);
    let text = trim_trailing_whitespace(&text);
    let text = collapse_blank_lines(&text);
    ensure_final_newline(&text)
}

/// CRLF and bare CR become LF.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove zero-width and soft-hyphen characters left over from ligature
/// and hyphenation handling.
fn strip_invisible_chars(text: &str) -> String {
    RE_INVISIBLE.replace_all(text, "").into_owned()
}

/// Strip spaces and tabs at end of line.
fn trim_trailing_whitespace(text: &str) -> String {
    RE_TRAILING_WS.replace_all(text, "").into_owned()
}

/// At most one blank line between paragraphs.
fn collapse_blank_lines(text: &str) -> String {
    RE_BLANK_RUNS.replace_all(text, "\n\n").into_owned()
}

/// Exactly one trailing newline.
fn ensure_final_newline(text: &str) -> String {
    format!("{}\n", text.trim_end_matches('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn strips_invisible_chars() {
        assert_eq!(strip_invisible_chars("a\u{200B}b\u{FEFF}c"), "abc");
        assert_eq!(strip_invisible_chars("soft\u{00AD}hyphen"), "softhyphen");
    }

    #[test]
    fn trims_trailing_whitespace() {
        assert_eq!(trim_trailing_whitespace("line  \nnext\t\n"), "line\nnext\n");
    }

    #[test]
    fn collapses_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
        // Single blank line is preserved
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn ensures_single_final_newline() {
        assert_eq!(ensure_final_newline("text"), "text\n");
        assert_eq!(ensure_final_newline("text\n\n\n"), "text\n");
    }

    #[test]
    fn cleanup_is_idempotent() {
        let raw = "Title\u{200B}  \r\n\r\n\r\n\r\nBody text   \r\n";
        let once = cleanup(raw);
        assert_eq!(once, "Title\n\nBody text\n");
        assert_eq!(cleanup(&once), once);
    }
}
