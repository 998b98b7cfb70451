//! Split planning: turn a filtered bookmark list into page ranges.
//!
//! This is the only stage with real logic, and it is deliberately pure —
//! plain data in, plain data out, no pdfium, no I/O — so every boundary
//! case can be pinned down with a vector literal.
//!
//! ## The "next kept entry" rule
//!
//! A range ends where the *next surviving* bookmark begins, not the next
//! bookmark in the raw outline. In keyword mode this lets a range span
//! past intervening non-matching sub-headings, so a split on "Chapter"
//! captures everything between two chapter titles rather than stopping at
//! the first arbitrary sub-section.
//!
//! ## Dropped pages
//!
//! Pages before the first kept bookmark (and, in keyword mode, pages
//! between a non-matching prefix and the first match) are never emitted.
//! Level mode at the deepest level is the only configuration guaranteed
//! to cover the whole document. This mirrors the long-standing behaviour
//! of the tool; do not "fix" it to pad ranges out to full coverage.

use crate::config::SelectionMode;
use crate::pipeline::outline::BookmarkEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Longest sanitised title carried into a filename; the `NNN_` prefix and
/// `.pdf` suffix come on top.
const MAX_NAME_LEN: usize = 50;

/// One contiguous page span to extract, with its derived output name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRange {
    /// Title of the bookmark that opens this range.
    pub title: String,
    /// First page of the range, zero-based.
    pub start_page: usize,
    /// One past the last page (half-open). `start_page == end_page` marks
    /// a degenerate zero-page range, which is still emitted so the writer
    /// can flag it instead of silently dropping the bookmark.
    pub end_page: usize,
    /// Filename stem: `NNN_<sanitised title>`, unique and ordered.
    pub output_name: String,
}

impl SplitRange {
    pub fn page_count(&self) -> usize {
        self.end_page - self.start_page
    }

    pub fn is_empty(&self) -> bool {
        self.start_page == self.end_page
    }
}

/// Does this entry survive the given selection mode?
fn is_kept(entry: &BookmarkEntry, mode: &SelectionMode) -> bool {
    match mode {
        SelectionMode::Level(max_level) => entry.level <= *max_level,
        SelectionMode::Keywords {
            keywords,
            case_sensitive,
        } => {
            if *case_sensitive {
                keywords.iter().any(|k| entry.title.contains(k.as_str()))
            } else {
                let title = entry.title.to_lowercase();
                keywords.iter().any(|k| title.contains(&k.to_lowercase()))
            }
        }
    }
}

/// Compute the split plan.
///
/// Entries are filtered by `mode`, then each kept entry opens a range that
/// runs to the next kept entry's page (the last range runs to
/// `page_count`). The result is ordered, pairwise non-overlapping, and may
/// be empty when nothing matches — callers treat that as "no matching
/// bookmarks", a normal outcome.
pub fn plan_ranges(
    entries: &[BookmarkEntry],
    mode: &SelectionMode,
    page_count: usize,
) -> Vec<SplitRange> {
    let kept: Vec<&BookmarkEntry> = entries.iter().filter(|e| is_kept(e, mode)).collect();

    kept.iter()
        .enumerate()
        .map(|(i, entry)| {
            let start_page = entry.page_index;
            let end_page = kept
                .get(i + 1)
                .map(|next| next.page_index)
                .unwrap_or(page_count)
                // A successor targeting an earlier page means the outline
                // is non-monotonic; clamp to an empty range rather than
                // emit a negative or overlapping one.
                .max(start_page);

            SplitRange {
                title: entry.title.clone(),
                start_page,
                end_page,
                output_name: output_name(i, &entry.title),
            }
        })
        .collect()
}

// ── Filename derivation ──────────────────────────────────────────────────

static RE_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-]+").unwrap());
static RE_UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// Derive a filesystem-safe, order-preserving filename stem from a title.
///
/// `seq` is the zero-based position in the plan; the emitted prefix is
/// 1-based and zero-padded so lexicographic filename order equals
/// extraction order and collisions between identical titles are impossible.
pub fn output_name(seq: usize, title: &str) -> String {
    format!("{:03}_{}", seq + 1, sanitize_title(title))
}

/// Pure `title → safe identifier` transform: trim, replace runs of
/// filename-unsafe characters with `_`, collapse and trim underscores,
/// clamp to [`MAX_NAME_LEN`] characters, fall back to `section` when
/// nothing survives.
pub fn sanitize_title(title: &str) -> String {
    let replaced = RE_UNSAFE.replace_all(title.trim(), "_");
    let collapsed = RE_UNDERSCORE_RUNS.replace_all(&replaced, "_");
    let trimmed: String = collapsed.trim_matches('_').chars().take(MAX_NAME_LEN).collect();
    let trimmed = trimmed.trim_matches('_').to_string();

    if trimmed.is_empty() {
        "section".to_string()
    } else {
        trimmed
    }
}
