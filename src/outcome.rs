//! Result types describing what a split run produced.
//!
//! Everything here is serde-serialisable so the CLI can emit the whole
//! outcome as JSON and callers can persist or diff run reports. Per-item
//! failure channels ([`RangeResult::error`], [`ConvertResult::error`])
//! carry the non-fatal errors; a run that returns `Ok(SplitOutcome)` may
//! still contain failed ranges or conversions — check [`SplitStats`].

use crate::error::{ConvertError, RangeError};
use crate::pipeline::outline::BookmarkEntry;
use crate::pipeline::plan::SplitRange;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The full result of one split run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOutcome {
    /// Local path of the source document (the downloaded file for URL
    /// sources).
    pub source: PathBuf,
    /// One entry per planned range, in plan order.
    pub ranges: Vec<RangeResult>,
    /// One entry per attempted markdown conversion (empty unless
    /// post-processing was requested).
    pub conversions: Vec<ConvertResult>,
    /// Aggregate counters and timings.
    pub stats: SplitStats,
}

impl SplitOutcome {
    /// Paths of the split PDFs that were actually written.
    pub fn written_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.ranges.iter().filter_map(|r| r.output_path.as_ref())
    }
}

/// What happened to one planned range.
///
/// Exactly one of three shapes:
/// * written — `output_path: Some`, `error: None`
/// * empty range, flagged — `output_path: None`, `error: None`,
///   `pages_written == 0`
/// * failed — `output_path: None`, `error: Some`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeResult {
    pub range: SplitRange,
    pub output_path: Option<PathBuf>,
    pub pages_written: usize,
    pub error: Option<RangeError>,
}

impl RangeResult {
    /// True for a degenerate zero-page range that was flagged rather than
    /// written (two consecutive kept bookmarks on the same page).
    pub fn is_empty_range(&self) -> bool {
        self.error.is_none() && self.output_path.is_none()
    }
}

/// What happened to one markdown conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResult {
    /// The split PDF that was converted.
    pub pdf_path: PathBuf,
    /// The markdown file, when conversion succeeded.
    pub markdown_path: Option<PathBuf>,
    pub error: Option<ConvertError>,
}

/// Aggregate counters for the run summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitStats {
    /// Page count of the source document.
    pub total_pages: usize,
    /// Bookmarks found in the outline before filtering.
    pub bookmarks_found: usize,
    /// Bookmarks surviving the level/keyword filter.
    pub bookmarks_kept: usize,
    /// Ranges produced by the planner (equals `bookmarks_kept`).
    pub ranges_planned: usize,
    /// Split PDFs actually written.
    pub files_written: usize,
    /// Zero-page ranges flagged instead of written.
    pub empty_ranges: usize,
    /// Ranges that failed with a [`RangeError`].
    pub failed_ranges: usize,
    /// Markdown files written (0 unless post-processing was requested).
    pub markdown_written: usize,
    /// Conversions that failed with a [`ConvertError`].
    pub markdown_failed: usize,
    /// Wall-clock time spent writing split PDFs, in milliseconds.
    pub split_duration_ms: u64,
    /// Wall-clock time spent on markdown conversion, in milliseconds.
    pub convert_duration_ms: u64,
    /// Total run duration, in milliseconds.
    pub total_duration_ms: u64,
}

/// Outline summary produced by [`crate::inspect`] without splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineReport {
    pub page_count: usize,
    /// Flattened bookmarks in natural outline order.
    pub bookmarks: Vec<BookmarkEntry>,
}

impl OutlineReport {
    /// Deepest nesting level present in the outline, if any bookmarks exist.
    pub fn max_level(&self) -> Option<usize> {
        self.bookmarks.iter().map(|b| b.level).max()
    }
}
