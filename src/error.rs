//! Error types for the pdfsplit library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SplitError`] — **Fatal**: the run cannot proceed at all (source
//!   unreachable, document unreadable, invalid configuration). Returned as
//!   `Err(SplitError)` from the top-level `split*` functions.
//!
//! * [`RangeError`] / [`ConvertError`] — **Non-fatal**: a single split range
//!   or a single markdown conversion failed but the remaining items are
//!   fine. Stored inside [`crate::outcome::RangeResult`] and
//!   [`crate::outcome::ConvertResult`] so callers can inspect partial
//!   success rather than losing the whole batch to one bad item.
//!
//! The separation lets callers decide their own tolerance: abort on the
//! first failed range, log and continue, or collect everything for a
//! post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfsplit library.
///
/// Per-range and per-conversion failures use [`RangeError`] and
/// [`ConvertError`] and are stored in the run outcome rather than
/// propagated here.
#[derive(Debug, Error)]
pub enum SplitError {
    // ── Source acquisition ────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Bookmark extraction ───────────────────────────────────────────────
    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The document could not be opened or its outline could not be read.
    #[error("Cannot read '{path}': {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    OutlineUnreadable { path: PathBuf, detail: String },

    // ── Planning / configuration ──────────────────────────────────────────
    /// Builder or CLI validation failed before any file I/O.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Output I/O ────────────────────────────────────────────────────────
    /// Could not create the output directory itself (per-file failures are
    /// non-fatal [`RangeError`]s instead).
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single split range.
///
/// Stored inside [`crate::outcome::RangeResult`] when writing one range
/// fails. The run continues with the remaining ranges.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum RangeError {
    /// The planned range exceeds the source document. Should not happen
    /// when the planner is correct, but checked before touching pdfium.
    #[error("Range '{name}': pages {start}..{end} out of bounds (document has {total} pages)")]
    OutOfBounds {
        name: String,
        start: usize,
        end: usize,
        total: usize,
    },

    /// pdfium failed to copy or save the pages of this range.
    #[error("Range '{name}': save failed: {detail}")]
    SaveFailed { name: String, detail: String },
}

/// A non-fatal error for a single markdown conversion.
///
/// Stored inside [`crate::outcome::ConvertResult`]; conversion failures
/// never abort the run, they accumulate into the final summary.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ConvertError {
    /// The split PDF could not be reopened for text extraction.
    #[error("'{path}': cannot read for conversion: {detail}")]
    Unreadable { path: PathBuf, detail: String },

    /// The document opened but contained no extractable text.
    #[error("'{path}': no extractable text")]
    NoText { path: PathBuf },

    /// The markdown file could not be written.
    #[error("'{path}': write failed: {detail}")]
    WriteFailed { path: PathBuf, detail: String },
}
