//! Pipeline stages for bookmark-driven PDF splitting.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. a different markdown converter) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ outline ──▶ plan ──▶ write ──▶ markdown
//! (URL/path) (pdfium)   (pure)  (pdfium)  (optional)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to a local file
//! 2. [`outline`] — flatten the bookmark tree into entries; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`plan`]    — the core logic: filter bookmarks and compute page
//!    ranges; pure, no pdfium dependency
//! 4. [`write`]   — copy each range into a fresh PDF and save it
//! 5. [`markdown`] — optional text-extraction conversion of the written
//!    fragments

pub mod input;
pub mod markdown;
pub mod outline;
pub mod plan;
pub mod write;
