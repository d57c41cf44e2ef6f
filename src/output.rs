//! Result types returned by the conversion API.

use serde::{Deserialize, Serialize};

/// One reconstructed page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number (`Page::index + 1`).
    pub page_num: usize,
    /// The page's Markdown blocks, without the trailing page separator.
    pub markdown: String,
    /// Fragments on the source page.
    pub fragment_count: usize,
    /// Blocks emitted (headings + paragraphs).
    pub line_count: usize,
    /// Blocks emitted as headings.
    pub heading_count: usize,
    /// Lines dropped because their text was blank.
    pub skipped_lines: usize,
}

/// Descriptive data about a fragment dump; no reconstruction involved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub page_count: usize,
    /// Fragment count per page, in page order.
    pub fragments_per_page: Vec<usize>,
    pub total_fragments: usize,
}

/// Aggregate counters for a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages that went through the reconstructor.
    pub processed_pages: usize,
    /// Pages left out by the page selection.
    pub skipped_pages: usize,
    pub total_fragments: usize,
    pub total_lines: usize,
    pub heading_lines: usize,
    pub blank_lines_skipped: usize,
    pub total_duration_ms: u64,
}

/// Full result of [`crate::convert::convert`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Assembled document.
    pub markdown: String,
    pub pages: Vec<PageResult>,
    pub metadata: DocumentMetadata,
    pub stats: ConversionStats,
}

/// File name for saving Markdown derived from a document title:
/// `"<title>.md"`, or `"document.md"` when the title is blank.
pub fn markdown_file_name(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        "document.md".to_string()
    } else {
        format!("{title}.md")
    }
}
