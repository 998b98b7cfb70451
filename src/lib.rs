//! # pdfsplit
//!
//! Split a PDF into smaller PDFs along its bookmark (outline) structure,
//! with optional markdown conversion of each fragment.
//!
//! Bookmarks are selected either by nesting level or by title keywords;
//! each surviving bookmark opens a fragment that runs to the next
//! surviving bookmark's page. Sources can be local paths or `http(s)`
//! URLs. Rendering is handled by the `pdfium-render` crate, which loads
//! the pdfium shared library at runtime.
//!
//! ## Quick start
//!
//! ```no_run
//! use pdfsplit::{split, SplitConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SplitConfig::builder()
//!         .level(0)
//!         .output_dir("chapters")
//!         .build()?;
//!
//!     let outcome = split("book.pdf", &config).await?;
//!     for path in outcome.written_files() {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Keyword selection and markdown post-processing:
//!
//! ```no_run
//! use pdfsplit::SplitConfig;
//!
//! let config = SplitConfig::builder()
//!     .keywords(["Chapter", "Appendix"])
//!     .post_to_markdown(true)
//!     .build()?;
//! # Ok::<(), pdfsplit::SplitError>(())
//! ```
//!
//! ## Failure model
//!
//! [`split`] returns `Err` only for problems that invalidate the whole
//! run. A single fragment failing to write or convert is recorded inside
//! the [`SplitOutcome`] and the run continues; inspect
//! [`SplitStats::failed_ranges`] and [`SplitStats::markdown_failed`] to
//! detect partial success.

pub mod config;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod split;

pub use config::{SelectionMode, SplitConfig, SplitConfigBuilder};
pub use error::{ConvertError, RangeError, SplitError};
pub use outcome::{ConvertResult, OutlineReport, RangeResult, SplitOutcome, SplitStats};
pub use pipeline::markdown::{MarkdownConverter, PdfiumConverter};
pub use pipeline::outline::BookmarkEntry;
pub use pipeline::plan::SplitRange;
pub use split::{inspect, split, split_sync};
