//! Error types for the edgequake-layout2md library.
//!
//! The layout reconstructor itself never fails: any geometry produces *some*
//! Markdown. Everything that can go wrong happens before it runs — the
//! fragment dump is missing, unreadable, or not the JSON shape the loader
//! expects — or after it, when the result is written to disk. Those failures
//! are all fatal for a conversion and are returned as [`Layout2MdError`] from
//! the top-level `convert*` functions.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-layout2md library.
#[derive(Debug, Error)]
pub enum Layout2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Fragment file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but does not start like a JSON document.
    ///
    /// The most common cause is passing the PDF itself instead of the
    /// fragment dump produced by the extraction engine.
    #[error("File is not a JSON fragment dump: '{path}'\nFirst bytes: {magic:?}")]
    NotFragmentJson { path: PathBuf, magic: Vec<u8> },

    /// The JSON was well-formed enough to open but does not describe pages
    /// of positioned fragments.
    #[error("Invalid fragment data in '{origin}': {detail}")]
    InvalidFragmentData { origin: String, detail: String },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_fragment_json_display_shows_magic() {
        let e = Layout2MdError::NotFragmentJson {
            path: PathBuf::from("scan.pdf"),
            magic: b"%PDF".to_vec(),
        };
        let msg = e.to_string();
        assert!(msg.contains("scan.pdf"), "got: {msg}");
        assert!(msg.contains("[37, 80, 68, 70]"), "got: {msg}");
    }

    #[test]
    fn invalid_fragment_data_display() {
        let e = Layout2MdError::InvalidFragmentData {
            origin: "pages.json".into(),
            detail: "missing field `y`".into(),
        };
        assert!(e.to_string().contains("pages.json"));
        assert!(e.to_string().contains("missing field `y`"));
    }

    #[test]
    fn page_out_of_range_display() {
        let e = Layout2MdError::PageOutOfRange { page: 9, total: 3 };
        assert_eq!(
            e.to_string(),
            "Page 9 is out of range (document has 3 pages)"
        );
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = Layout2MdError::OutputWriteFailed {
            path: PathBuf::from("/readonly/out.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/readonly/out.md"));
    }
}
