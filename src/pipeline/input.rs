//! Source acquisition: normalise a user-supplied path or URL to a local file.
//!
//! ## Why download to a temp file?
//!
//! pdfium requires a file-system path — it cannot stream from a byte buffer.
//! Downloading into a `TempDir` gives us a path pdfium can open. Whether the
//! temp directory outlives the run is the caller's choice: with cleanup
//! requested the `TempDir` drop removes it (success or failure alike);
//! without it, [`ResolvedInput::keep`] releases the directory so the
//! downloaded file can be re-split later without re-fetching. We validate
//! the PDF magic bytes (`%PDF`) before returning so callers get a
//! meaningful error rather than a pdfium crash — this also catches HTML
//! error pages served with a 200 status.

use crate::error::SplitError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// The resolved source — either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Source was already a local file.
    Local(PathBuf),
    /// Source was a URL; PDF downloaded into a temp directory. The
    /// `TempDir` is held so the file lives at least as long as the run.
    Downloaded { path: PathBuf, temp_dir: TempDir },
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }

    /// Release ownership of any downloaded temp directory so it survives
    /// this run. Local sources are unaffected.
    pub fn keep(self) -> PathBuf {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, temp_dir } => {
                let kept = temp_dir.keep();
                debug!("Keeping downloaded source in {}", kept.display());
                path
            }
        }
    }
}

/// Check if the source string looks like a URL.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Resolve the source string to a local PDF file path.
///
/// If the source is a URL, download it to a temporary directory.
/// If the source is a local file, validate it exists and is a readable PDF.
pub async fn resolve_source(
    source: &str,
    timeout_secs: u64,
) -> Result<ResolvedInput, SplitError> {
    if is_url(source) {
        download_url(source, timeout_secs).await
    } else {
        resolve_local(source)
    }
}

/// Resolve a local file path, validating existence and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, SplitError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(SplitError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            // Verify PDF magic bytes; a file too short to hold them
            // cannot be a PDF either
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
                return Err(SplitError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SplitError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(SplitError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL into a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, SplitError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SplitError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SplitError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SplitError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(SplitError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    // The magic-byte check below is authoritative; a suspicious header is
    // only worth a warning (servers frequently mislabel PDFs).
    if let Some(content_type) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !content_type.contains("pdf") && !content_type.contains("octet-stream") {
            warn!("Content-Type may not be a PDF: {}", content_type);
        }
    }

    let filename = extract_filename(url);

    let temp_dir = TempDir::new().map_err(|e| SplitError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SplitError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    // Verify PDF magic bytes before writing anything to disk
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(SplitError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| SplitError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        temp_dir,
    })
}

/// Extract a reasonable filename from the URL, falling back to a fixed name.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.to_ascii_lowercase().ends_with(".pdf") {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(
            extract_filename("https://example.com/papers/report.pdf"),
            "report.pdf"
        );
        assert_eq!(
            extract_filename("https://example.com/papers/1706.03762"),
            "downloaded.pdf"
        );
        assert_eq!(extract_filename("https://example.com/"), "downloaded.pdf");
    }

    #[test]
    fn local_missing_file_rejected() {
        let err = resolve_local("/no/such/file.pdf").unwrap_err();
        assert!(matches!(err, SplitError::FileNotFound { .. }));
    }

    #[test]
    fn local_non_pdf_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not_a_pdf.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"<html>nope</html>").unwrap();

        let err = resolve_local(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SplitError::NotAPdf { .. }));
    }

    #[test]
    fn local_truncated_file_rejected() {
        // Shorter than the magic bytes themselves
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stub.pdf");
        std::fs::write(&path, b"%PD").unwrap();

        let err = resolve_local(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SplitError::NotAPdf { .. }));

        let empty = dir.path().join("empty.pdf");
        std::fs::write(&empty, b"").unwrap();
        let err = resolve_local(empty.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SplitError::NotAPdf { .. }));
    }

    #[test]
    fn resolved_input_is_debuggable() {
        let resolved = ResolvedInput::Local(PathBuf::from("/tmp/doc.pdf"));
        assert!(format!("{resolved:?}").contains("doc.pdf"));
    }

    #[test]
    fn local_pdf_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.7\n%fake body").unwrap();

        let resolved = resolve_local(path.to_str().unwrap()).unwrap();
        assert_eq!(resolved.path(), path);
    }
}
