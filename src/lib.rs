//! # edgequake-layout2md
//!
//! Reconstruct Markdown from the positioned text fragments of PDF pages.
//!
//! ## Why this crate?
//!
//! A PDF text layer is a flat bag of glyph runs: each has a string, an
//! origin, a width and a font-size-like height, but nothing says which runs
//! form a line, where the word breaks are, or which lines are headings. This
//! crate rebuilds that structure with a small, deterministic layout pass and
//! emits plain Markdown that a human can then correct in an editor.
//!
//! Opening the PDF is someone else's job: any extraction engine that can dump
//! `{text, x, y, width, height}` records (or pdf.js-style `{str, transform}`
//! items) per page can feed it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! fragments.json
//!  │
//!  ├─ 1. Input     load the JSON dump (path or bytes), pick pages
//!  ├─ 2. Lines     bucket by y (5 units), order y↓ then x↑, infer spaces (gap > 10)
//!  ├─ 3. Headings  mean height > 20 / 16 / 14 → #, ##, ###; drop blank lines
//!  └─ 4. Output    blocks + "\n---\n" after every page, per-page stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use edgequake_layout2md::{reconstruct, Page, PositionedFragment};
//!
//! let pages = vec![Page::new(0, vec![
//!     PositionedFragment::new("Hello", 0.0, 100.0, 20.0, 10.0),
//!     PositionedFragment::new("World", 40.0, 100.0, 30.0, 10.0),
//! ])];
//! assert_eq!(reconstruct(&pages), "Hello World\n\n\n---\n\n");
//! ```
//!
//! From a file, with stats:
//!
//! ```rust,no_run
//! use edgequake_layout2md::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = convert("report.pdf.json", &ConversionConfig::default()).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("{} headings", output.stats.heading_lines);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `layout2md` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod reconstruct;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, HeadingRule, LayoutConfig, PageSelection,
    PageSeparator,
};
pub use convert::{convert, convert_from_bytes, convert_sync, convert_to_file, inspect};
pub use document::{FragmentDocument, Page, PositionedFragment, TextRun};
pub use error::Layout2MdError;
pub use output::{
    markdown_file_name, ConversionOutput, ConversionStats, DocumentMetadata, PageResult,
};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use reconstruct::{reconstruct, reconstruct_page, reconstruct_with};
pub use stream::{convert_stream, PageStream};
