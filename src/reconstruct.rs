//! The layout reconstructor: positioned fragments in, Markdown out.
//!
//! ```text
//! Page ──▶ lines::group_lines ──▶ headings::build_block ──▶ Block::to_markdown
//!          (bucket, sort y↓,        (trim, mean height,        ("# text\n\n")
//!           sort x↑, spacing)        threshold cascade)
//! ```
//!
//! Pages are independent; each one's blocks are followed by the configured
//! page separator (a horizontal rule by default), including pages that
//! produced no blocks.
//!
//! Everything here is a pure function of its arguments: no I/O, no logging,
//! no shared state. It is safe to call from any thread and always returns a
//! string, whatever the geometry looks like.
//!
//! # Example
//! ```rust
//! use edgequake_layout2md::{reconstruct, Page, PositionedFragment};
//!
//! let page = Page::new(0, vec![
//!     PositionedFragment::new("Introduction", 72.0, 700.0, 120.0, 22.0),
//!     PositionedFragment::new("Hello", 72.0, 650.0, 20.0, 11.0),
//!     PositionedFragment::new("World", 112.0, 650.0, 30.0, 11.0),
//! ]);
//! assert_eq!(
//!     reconstruct(&[page]),
//!     "# Introduction\n\nHello World\n\n\n---\n\n"
//! );
//! ```

use crate::config::LayoutConfig;
use crate::document::Page;
use crate::output::PageResult;
use crate::pipeline::headings::build_block;
use crate::pipeline::lines::group_lines;

/// Reconstruct Markdown with the reference thresholds.
pub fn reconstruct(pages: &[Page]) -> String {
    reconstruct_with(pages, &LayoutConfig::default())
}

/// Reconstruct Markdown with explicit thresholds.
pub fn reconstruct_with(pages: &[Page], config: &LayoutConfig) -> String {
    let mut markdown = String::new();
    for page in pages {
        let result = reconstruct_page(page, config);
        markdown.push_str(&result.markdown);
        markdown.push_str(&page_separator(page, config));
    }
    markdown
}

/// Reconstruct a single page. The returned Markdown excludes the separator.
pub fn reconstruct_page(page: &Page, config: &LayoutConfig) -> PageResult {
    let lines = group_lines(&page.items, config);

    let mut result = PageResult {
        page_num: page.index.saturating_add(1),
        fragment_count: page.items.len(),
        ..Default::default()
    };

    for line in &lines {
        match build_block(line, config) {
            Some(block) => {
                result.line_count += 1;
                if block.is_heading() {
                    result.heading_count += 1;
                }
                result.markdown.push_str(&block.to_markdown());
            }
            None => result.skipped_lines += 1,
        }
    }

    result
}

/// Separator block following `page`.
pub fn page_separator(page: &Page, config: &LayoutConfig) -> String {
    config
        .page_separator
        .render(page.index.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSeparator;
    use crate::document::PositionedFragment;

    fn single(text: &str, height: f64) -> Page {
        Page::new(0, vec![PositionedFragment::new(text, 0.0, 0.0, 10.0, height)])
    }

    #[test]
    fn page_counters() {
        let page = Page::new(
            2,
            vec![
                PositionedFragment::new("Title", 0.0, 100.0, 40.0, 24.0),
                PositionedFragment::new("  ", 0.0, 80.0, 10.0, 10.0),
                PositionedFragment::new("body", 0.0, 60.0, 40.0, 10.0),
            ],
        );
        let result = reconstruct_page(&page, &LayoutConfig::default());
        assert_eq!(result.page_num, 3);
        assert_eq!(result.fragment_count, 3);
        assert_eq!(result.line_count, 2);
        assert_eq!(result.heading_count, 1);
        assert_eq!(result.skipped_lines, 1);
        assert_eq!(result.markdown, "# Title\n\nbody\n\n");
    }

    #[test]
    fn comment_separator_uses_page_number() {
        let layout = LayoutConfig {
            page_separator: PageSeparator::Comment,
            ..Default::default()
        };
        let pages = vec![single("a", 10.0), Page::new(1, vec![])];
        assert_eq!(
            reconstruct_with(&pages, &layout),
            "a\n\n\n<!-- page 1 -->\n\n\n<!-- page 2 -->\n\n"
        );
    }

    #[test]
    fn huge_page_index_does_not_overflow() {
        let page = Page::new(usize::MAX, vec![]);
        let layout = LayoutConfig {
            page_separator: PageSeparator::Comment,
            ..Default::default()
        };
        let out = reconstruct_with(&[page], &layout);
        assert!(out.contains(&usize::MAX.to_string()));
    }

    #[test]
    fn zero_bucket_size_is_still_total() {
        // y / 0 gives +inf, -inf and NaN (for y = 0) rows.
        let layout = LayoutConfig {
            bucket_size: 0.0,
            ..Default::default()
        };
        let page = Page::new(
            0,
            vec![
                PositionedFragment::new("up", 0.0, 10.0, 5.0, 10.0),
                PositionedFragment::new("zero", 0.0, 0.0, 5.0, 10.0),
                PositionedFragment::new("down", 0.0, -10.0, 5.0, 10.0),
            ],
        );
        assert_eq!(
            reconstruct_with(&[page], &layout),
            "up\n\ndown\n\nzero\n\n\n---\n\n"
        );
    }
}
