//! Configuration types for a split run.
//!
//! All behaviour is controlled through [`SplitConfig`], built via its
//! [`SplitConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to pass the whole run description around, serialise the
//! interesting parts for logging, and diff two runs to understand why
//! their outputs differ.
//!
//! # Design choice: tagged selection mode
//! Whether bookmarks are selected by nesting level or by title keywords is
//! decided exactly once, at configuration-build time, as a
//! [`SelectionMode`] variant. Downstream code never branches on "which
//! flag was set" — the planner simply matches on the variant.

use crate::error::SplitError;
use crate::pipeline::markdown::MarkdownConverter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// How bookmarks are chosen as split points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Keep only bookmarks with nesting depth `<= max_level` (0 = top-level).
    Level(usize),
    /// Keep only bookmarks whose title contains at least one keyword as a
    /// substring. Matching is case-insensitive unless `case_sensitive`.
    Keywords {
        keywords: Vec<String>,
        case_sensitive: bool,
    },
}

/// Configuration for one split run.
///
/// Built via [`SplitConfig::builder()`].
///
/// # Example
/// ```rust
/// use pdfsplit::SplitConfig;
///
/// let config = SplitConfig::builder()
///     .level(1)
///     .output_dir("./chapters")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SplitConfig {
    /// Which bookmarks become split points.
    pub mode: SelectionMode,

    /// Directory for the split PDF fragments. Default: `./split_pdfs`.
    /// Created if missing; pre-existing files at colliding paths are
    /// overwritten.
    pub output_dir: PathBuf,

    /// Convert each written fragment to markdown after splitting.
    /// Default: false.
    pub post_to_markdown: bool,

    /// Directory for markdown files when post-processing is enabled.
    /// Default: `./markdown`.
    pub markdown_dir: PathBuf,

    /// Remove the downloaded temp file at the end of the run. Default:
    /// false — a downloaded source is kept so it can be re-split without
    /// re-fetching.
    pub cleanup: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL sources in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Markdown converter override. When `None` the built-in pdfium
    /// text-extraction converter is used. Injectable so the conversion
    /// step can be exercised with fakes.
    pub converter: Option<Arc<dyn MarkdownConverter>>,
}

impl fmt::Debug for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitConfig")
            .field("mode", &self.mode)
            .field("output_dir", &self.output_dir)
            .field("post_to_markdown", &self.post_to_markdown)
            .field("markdown_dir", &self.markdown_dir)
            .field("cleanup", &self.cleanup)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "converter",
                &self.converter.as_ref().map(|_| "<dyn MarkdownConverter>"),
            )
            .finish()
    }
}

impl SplitConfig {
    /// Create a new builder. The selection mode must be set before
    /// [`SplitConfigBuilder::build`] will succeed.
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder::default()
    }
}

/// Builder for [`SplitConfig`].
#[derive(Default)]
pub struct SplitConfigBuilder {
    mode: Option<SelectionMode>,
    output_dir: Option<PathBuf>,
    post_to_markdown: bool,
    markdown_dir: Option<PathBuf>,
    cleanup: bool,
    password: Option<String>,
    download_timeout_secs: Option<u64>,
    converter: Option<Arc<dyn MarkdownConverter>>,
}

impl SplitConfigBuilder {
    /// Select bookmarks by maximum nesting level (0 = top-level only).
    pub fn level(mut self, max_level: usize) -> Self {
        self.mode = Some(SelectionMode::Level(max_level));
        self
    }

    /// Select bookmarks by title keywords (case-insensitive).
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mode = Some(SelectionMode::Keywords {
            keywords: keywords.into_iter().map(Into::into).collect(),
            case_sensitive: false,
        });
        self
    }

    /// Make keyword matching case-sensitive. No effect in level mode.
    pub fn case_sensitive(mut self, v: bool) -> Self {
        if let Some(SelectionMode::Keywords {
            ref mut case_sensitive,
            ..
        }) = self.mode
        {
            *case_sensitive = v;
        }
        self
    }

    /// Set the selection mode directly.
    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn post_to_markdown(mut self, v: bool) -> Self {
        self.post_to_markdown = v;
        self
    }

    pub fn markdown_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.markdown_dir = Some(dir.into());
        self
    }

    pub fn cleanup(mut self, v: bool) -> Self {
        self.cleanup = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.download_timeout_secs = Some(secs);
        self
    }

    pub fn converter(mut self, converter: Arc<dyn MarkdownConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Fails with [`SplitError::InvalidConfig`] when no selection mode was
    /// chosen or keyword mode carries an empty keyword list — both are
    /// caught here, before any file I/O happens.
    pub fn build(self) -> Result<SplitConfig, SplitError> {
        let mode = self.mode.ok_or_else(|| {
            SplitError::InvalidConfig(
                "either a maximum level or a keyword list must be specified".into(),
            )
        })?;

        if let SelectionMode::Keywords { ref keywords, .. } = mode {
            if keywords.is_empty() || keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(SplitError::InvalidConfig(
                    "keyword mode requires at least one non-empty keyword".into(),
                ));
            }
        }

        Ok(SplitConfig {
            mode,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from("./split_pdfs")),
            post_to_markdown: self.post_to_markdown,
            markdown_dir: self
                .markdown_dir
                .unwrap_or_else(|| PathBuf::from("./markdown")),
            cleanup: self.cleanup,
            password: self.password,
            download_timeout_secs: self.download_timeout_secs.unwrap_or(120),
            converter: self.converter,
        })
    }
}
