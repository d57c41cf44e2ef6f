//! Heading classification and block emission.
//!
//! A line's mean fragment height is run through an ordered cascade of
//! [`HeadingRule`]s; the first rule whose threshold is strictly exceeded
//! decides the level. Lines matching no rule are plain paragraphs. Lines
//! whose text trims to nothing produce no block at all.

use crate::config::{HeadingRule, LayoutConfig};
use crate::pipeline::lines::Line;

/// What a line turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Paragraph,
}

/// A classified, non-empty line ready to be written as Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Trimmed line text.
    pub text: String,
}

impl Block {
    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading(_))
    }

    /// The block followed by one blank line.
    pub fn to_markdown(&self) -> String {
        match self.kind {
            BlockKind::Heading(level) => {
                format!("{} {}\n\n", "#".repeat(usize::from(level)), self.text)
            }
            BlockKind::Paragraph => format!("{}\n\n", self.text),
        }
    }
}

/// First rule whose `min_height` is strictly below `mean_height` wins.
///
/// NaN heights compare false against every threshold and fall through to
/// [`BlockKind::Paragraph`].
pub fn classify(mean_height: f64, rules: &[HeadingRule]) -> BlockKind {
    rules
        .iter()
        .find(|rule| mean_height > rule.min_height)
        .map(|rule| BlockKind::Heading(rule.level))
        .unwrap_or(BlockKind::Paragraph)
}

/// Strip leading/trailing whitespace, including the byte-order mark that some
/// extraction engines leave on the first run of a page.
///
/// NEL (U+0085) is not trimmed, so a line holding only NEL is kept.
pub fn trim_line(text: &str) -> &str {
    text.trim_matches(is_trimmable)
}

fn is_trimmable(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Render and classify a line; `None` when it has no visible text.
pub fn build_block(line: &Line<'_>, config: &LayoutConfig) -> Option<Block> {
    let raw = line.text(config.gap_threshold);
    let text = trim_line(&raw);
    if text.is_empty() {
        return None;
    }
    Some(Block {
        kind: classify(line.mean_height(), &config.heading_rules),
        text: text.to_string(),
    })
}
