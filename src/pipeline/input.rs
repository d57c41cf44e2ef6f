//! Input resolution: load a fragment dump from a local path or a byte buffer.
//!
//! The extraction engine that turns a PDF into positioned fragments runs
//! elsewhere; it hands us JSON. This stage is where "upstream" failures are
//! caught — missing file, wrong permissions, a PDF passed by mistake,
//! malformed JSON — so the reconstructor is only ever called with complete
//! page data.

use crate::document::FragmentDocument;
use crate::error::Layout2MdError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A successfully loaded fragment dump.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Where the data came from (path or caller-supplied label).
    pub origin: String,
    /// Title embedded in the dump, else derived from the origin.
    pub title: String,
    pub document: FragmentDocument,
}

/// Read and parse a fragment dump from disk.
pub async fn resolve_input(path_str: &str) -> Result<LoadedDocument, Layout2MdError> {
    let path = PathBuf::from(path_str);
    let bytes = read_local(&path).await?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    load_bytes(&bytes, path_str)
}

/// Check and parse a dump already in memory (stdin, a network body, …).
///
/// Runs the same JSON magic check as [`resolve_input`], so a PDF piped in by
/// mistake is reported as [`Layout2MdError::NotFragmentJson`].
pub fn load_bytes(bytes: &[u8], origin: &str) -> Result<LoadedDocument, Layout2MdError> {
    check_json_magic(Path::new(origin), bytes)?;
    parse_document(bytes, origin)
}

/// Read the file, mapping I/O failures to loader errors.
async fn read_local(path: &Path) -> Result<Vec<u8>, Layout2MdError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Layout2MdError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Layout2MdError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Layout2MdError::Internal(format!(
            "Failed to read '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Reject input whose first non-whitespace byte cannot start a JSON array
/// or object. Catches the common mistake of passing the PDF itself.
fn check_json_magic(path: &Path, bytes: &[u8]) -> Result<(), Layout2MdError> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    match first {
        Some(b'[') | Some(b'{') => Ok(()),
        _ => Err(Layout2MdError::NotFragmentJson {
            path: path.to_path_buf(),
            magic: bytes.iter().take(4).copied().collect(),
        }),
    }
}

/// Parse a JSON fragment dump already in memory.
///
/// `origin` is a path or label used for error messages and for deriving the
/// title when the dump does not carry one.
pub fn parse_document(bytes: &[u8], origin: &str) -> Result<LoadedDocument, Layout2MdError> {
    let document: FragmentDocument =
        serde_json::from_slice(bytes).map_err(|e| Layout2MdError::InvalidFragmentData {
            origin: origin.to_string(),
            detail: e.to_string(),
        })?;

    let title = document
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| title_from_origin(origin));

    debug!(
        "Parsed {} pages / {} fragments from {}",
        document.pages.len(),
        document.fragment_count(),
        origin
    );

    Ok(LoadedDocument {
        origin: origin.to_string(),
        title,
        document,
    })
}

/// File name without directories and without a trailing `.json`, then
/// `.pdf`, extension. `"scans/report.pdf.json"` → `"report"`.
pub fn title_from_origin(origin: &str) -> String {
    let name = Path::new(origin)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let name = strip_suffix_ignore_case(name, ".json");
    let name = strip_suffix_ignore_case(name, ".pdf");
    if name.trim().is_empty() {
        "document".to_string()
    } else {
        name.to_string()
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> &'a str {
    if s.len() >= suffix.len()
        && s.is_char_boundary(s.len() - suffix.len())
        && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    {
        &s[..s.len() - suffix.len()]
    } else {
        s
    }
}
