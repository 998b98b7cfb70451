//! Bookmark extraction: flatten the PDF outline tree into a list.
//!
//! ## Why flatten?
//!
//! The planner only needs each bookmark's title, nesting depth, and target
//! page, in the order a reader would encounter them in the sidebar. A flat
//! `Vec<BookmarkEntry>` in depth-first document order carries exactly that
//! and keeps the core range computation free of any pdfium types.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! thread designed for blocking operations.

use crate::error::SplitError;
use pdfium_render::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Bookmark trees deeper than this are almost certainly cyclic or corrupt;
/// traversal stops with a warning instead of recursing forever.
const MAX_OUTLINE_DEPTH: usize = 32;

/// One outline node, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEntry {
    /// Bookmark title as stored in the document.
    pub title: String,
    /// Nesting depth, 0 = top-level.
    pub level: usize,
    /// Zero-based index of the page the bookmark targets. Bookmarks with
    /// an unresolvable destination fall back to page 0.
    pub page_index: usize,
}

/// Everything the planner needs to know about a document.
#[derive(Debug, Clone)]
pub struct DocumentOutline {
    pub page_count: usize,
    /// Flattened bookmarks in depth-first document order. Empty when the
    /// PDF has no outline — valid input, not an error.
    pub bookmarks: Vec<BookmarkEntry>,
}

/// Read the outline and page count of a PDF.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
pub async fn read_outline(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentOutline, SplitError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || read_outline_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| SplitError::Internal(format!("Outline task panicked: {}", e)))?
}

/// Blocking implementation of outline extraction.
fn read_outline_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentOutline, SplitError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| map_load_error(e, pdf_path, password))?;

    let page_count = document.pages().len() as usize;

    let mut bookmarks = Vec::new();
    for bookmark in document.bookmarks().iter() {
        visit_bookmark(&bookmark, 0, &mut bookmarks);
    }

    if bookmarks.is_empty() {
        warn!("No bookmarks found in: {}", pdf_path.display());
    } else {
        info!(
            "Extracted {} bookmarks from {} ({} pages)",
            bookmarks.len(),
            pdf_path.display(),
            page_count
        );
    }

    Ok(DocumentOutline {
        page_count,
        bookmarks,
    })
}

/// Depth-first walk: push the node, then its children, then its siblings
/// (siblings are handled by the caller's loop).
fn visit_bookmark(bookmark: &PdfBookmark, level: usize, out: &mut Vec<BookmarkEntry>) {
    if level >= MAX_OUTLINE_DEPTH {
        warn!("Maximum outline depth reached at level {}", level);
        return;
    }

    let title = bookmark
        .title()
        .unwrap_or_else(|| "Untitled".to_string());

    let page_index = bookmark
        .destination()
        .and_then(|dest| dest.page_index().ok())
        .unwrap_or(0) as usize;

    debug!("Bookmark (level {}): '{}' → page {}", level, title, page_index);

    out.push(BookmarkEntry {
        title,
        level,
        page_index,
    });

    let mut child = bookmark.first_child();
    while let Some(c) = child {
        visit_bookmark(&c, level + 1, out);
        child = c.next_sibling();
    }
}

/// Map a pdfium load error to the matching [`SplitError`] variant.
///
/// pdfium-render does not expose a structured "wrong password" error, so
/// the message is matched the same way the document loader distinguishes
/// missing vs. wrong passwords everywhere else in this crate.
pub(crate) fn map_load_error(
    e: PdfiumError,
    pdf_path: &Path,
    password: Option<&str>,
) -> SplitError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            SplitError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            SplitError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        SplitError::OutlineUnreadable {
            path: pdf_path.to_path_buf(),
            detail: err_str,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_equality_and_serialisation() {
        let entry = BookmarkEntry {
            title: "Chapter 1".into(),
            level: 0,
            page_index: 4,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: BookmarkEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn load_error_mapping() {
        let path = Path::new("locked.pdf");

        let e = map_load_error(PdfiumError::PdfiumLibraryInternalError(
            PdfiumInternalError::PasswordError,
        ), path, None);
        assert!(matches!(e, SplitError::PasswordRequired { .. }));

        let e = map_load_error(PdfiumError::PdfiumLibraryInternalError(
            PdfiumInternalError::PasswordError,
        ), path, Some("hunter2"));
        assert!(matches!(e, SplitError::WrongPassword { .. }));

        let e = map_load_error(PdfiumError::PdfiumLibraryInternalError(
            PdfiumInternalError::FormatError,
        ), path, None);
        assert!(matches!(e, SplitError::OutlineUnreadable { .. }));
    }
}
