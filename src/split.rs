//! Top-level split runner: wires the pipeline stages together.
//!
//! [`split`] is the single entry point the CLI and library callers use.
//! It owns the run lifecycle — source acquisition, outline extraction,
//! planning, fragment writing, optional markdown conversion — and the
//! policy decisions between stages: which failures abort the run and
//! which are recorded per-item and carried to the end.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::outcome::{ConvertResult, OutlineReport, SplitOutcome, SplitStats};
use crate::pipeline::input::{resolve_source, ResolvedInput};
use crate::pipeline::markdown::{MarkdownConverter, PdfiumConverter};
use crate::pipeline::outline::read_outline;
use crate::pipeline::plan::plan_ranges;
use crate::pipeline::write::write_ranges;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Download timeout used by [`inspect`], which takes no configuration.
const INSPECT_TIMEOUT_SECS: u64 = 120;

/// Split a PDF into per-bookmark fragments.
///
/// `source` is a local path or an `http(s)` URL. Fatal problems (source
/// unreachable, document unreadable, output directory uncreatable) return
/// `Err`; per-range and per-conversion failures are recorded in the
/// returned [`SplitOutcome`] instead. A run that matches no bookmarks
/// returns `Ok` with an empty plan — callers decide whether that is an
/// error for them.
pub async fn split(source: &str, config: &SplitConfig) -> Result<SplitOutcome, SplitError> {
    let run_start = Instant::now();

    let resolved = resolve_source(source, config.download_timeout_secs).await?;

    // With cleanup requested the guard's Drop removes a downloaded temp
    // directory on every exit path, including errors. Without it the
    // download is released immediately so it survives for later re-runs.
    let (pdf_path, _temp_guard): (PathBuf, Option<ResolvedInput>) = if config.cleanup {
        (resolved.path().to_path_buf(), Some(resolved))
    } else {
        (resolved.keep(), None)
    };

    let outline = read_outline(&pdf_path, config.password.as_deref()).await?;

    let ranges = plan_ranges(&outline.bookmarks, &config.mode, outline.page_count);

    let mut stats = SplitStats {
        total_pages: outline.page_count,
        bookmarks_found: outline.bookmarks.len(),
        bookmarks_kept: ranges.len(),
        ranges_planned: ranges.len(),
        ..SplitStats::default()
    };

    if ranges.is_empty() {
        warn!("No bookmarks matched the selection; nothing to split");
        stats.total_duration_ms = run_start.elapsed().as_millis() as u64;
        return Ok(SplitOutcome {
            source: pdf_path,
            ranges: Vec::new(),
            conversions: Vec::new(),
            stats,
        });
    }

    info!(
        "Planned {} fragment(s) from {} bookmark(s) across {} pages",
        ranges.len(),
        outline.bookmarks.len(),
        outline.page_count
    );

    std::fs::create_dir_all(&config.output_dir).map_err(|e| SplitError::OutputDirFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let split_start = Instant::now();
    let range_results = write_ranges(
        &pdf_path,
        ranges,
        &config.output_dir,
        config.password.as_deref(),
    )
    .await?;
    stats.split_duration_ms = split_start.elapsed().as_millis() as u64;

    stats.files_written = range_results.iter().filter(|r| r.output_path.is_some()).count();
    stats.empty_ranges = range_results.iter().filter(|r| r.is_empty_range()).count();
    stats.failed_ranges = range_results.iter().filter(|r| r.error.is_some()).count();

    let conversions = if config.post_to_markdown {
        let convert_start = Instant::now();
        let written: Vec<PathBuf> = range_results
            .iter()
            .filter_map(|r| r.output_path.clone())
            .collect();
        let converter = config
            .converter
            .clone()
            .unwrap_or_else(|| Arc::new(PdfiumConverter));
        let results = convert_fragments(written, &config.markdown_dir, converter).await?;
        stats.convert_duration_ms = convert_start.elapsed().as_millis() as u64;
        stats.markdown_written = results.iter().filter(|c| c.markdown_path.is_some()).count();
        stats.markdown_failed = results.iter().filter(|c| c.error.is_some()).count();
        results
    } else {
        Vec::new()
    };

    stats.total_duration_ms = run_start.elapsed().as_millis() as u64;

    info!(
        "Done: {} written, {} empty, {} failed in {}ms",
        stats.files_written, stats.empty_ranges, stats.failed_ranges, stats.total_duration_ms
    );

    Ok(SplitOutcome {
        source: pdf_path,
        ranges: range_results,
        conversions,
        stats,
    })
}

/// Blocking wrapper around [`split`] for synchronous callers.
pub fn split_sync(source: &str, config: &SplitConfig) -> Result<SplitOutcome, SplitError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SplitError::Internal(format!("Failed to create runtime: {}", e)))?
        .block_on(split(source, config))
}

/// Read a document's outline without splitting anything.
///
/// Downloads from URL sources are discarded when inspection finishes.
pub async fn inspect(source: &str, password: Option<&str>) -> Result<OutlineReport, SplitError> {
    let resolved = resolve_source(source, INSPECT_TIMEOUT_SECS).await?;
    let outline = read_outline(resolved.path(), password).await?;

    Ok(OutlineReport {
        page_count: outline.page_count,
        bookmarks: outline.bookmarks,
    })
}

/// Convert each written fragment to markdown, one file per fragment.
///
/// Runs on a blocking thread because the default converter drives pdfium.
/// Failures are per-fragment; the markdown directory itself failing to
/// appear is fatal.
async fn convert_fragments(
    written: Vec<PathBuf>,
    markdown_dir: &Path,
    converter: Arc<dyn MarkdownConverter>,
) -> Result<Vec<ConvertResult>, SplitError> {
    std::fs::create_dir_all(markdown_dir).map_err(|e| SplitError::OutputDirFailed {
        path: markdown_dir.to_path_buf(),
        source: e,
    })?;

    let dir = markdown_dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        written
            .into_iter()
            .map(|pdf_path| convert_one(&pdf_path, &dir, converter.as_ref()))
            .collect()
    })
    .await
    .map_err(|e| SplitError::Internal(format!("Conversion task panicked: {}", e)))
}

fn convert_one(pdf_path: &Path, markdown_dir: &Path, converter: &dyn MarkdownConverter) -> ConvertResult {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fragment".to_string());
    let md_path = markdown_dir.join(format!("{}.md", stem));

    let result = converter.convert(pdf_path).and_then(|markdown| {
        std::fs::write(&md_path, markdown).map_err(|e| crate::error::ConvertError::WriteFailed {
            path: md_path.clone(),
            detail: e.to_string(),
        })
    });

    match result {
        Ok(()) => {
            info!("Converted {} → {}", pdf_path.display(), md_path.display());
            ConvertResult {
                pdf_path: pdf_path.to_path_buf(),
                markdown_path: Some(md_path),
                error: None,
            }
        }
        Err(error) => {
            warn!("{} ({})", error, converter.name());
            ConvertResult {
                pdf_path: pdf_path.to_path_buf(),
                markdown_path: None,
                error: Some(error),
            }
        }
    }
}
