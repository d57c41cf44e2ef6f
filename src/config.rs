//! Configuration types for fragment-to-Markdown conversion.
//!
//! Two layers:
//!
//! * [`LayoutConfig`] — the geometric thresholds the reconstructor works with.
//!   Plain data, serde-serialisable, and its [`Default`] reproduces the
//!   reference behaviour exactly (bucket 5, gap 10, headings 20/16/14).
//! * [`ConversionConfig`] — everything around it: page selection, front
//!   matter, progress reporting. Built via [`ConversionConfigBuilder`], which
//!   validates the thresholds before any conversion runs.

use crate::error::Layout2MdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default vertical quantum used to merge fragments into lines.
pub const DEFAULT_BUCKET_SIZE: f64 = 5.0;

/// Default horizontal gap above which a space is inserted between fragments.
pub const DEFAULT_GAP_THRESHOLD: f64 = 10.0;

/// One step of the heading cascade: lines whose mean height is strictly
/// greater than `min_height` become headings of `level`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingRule {
    pub min_height: f64,
    pub level: u8,
}

impl HeadingRule {
    pub const fn new(min_height: f64, level: u8) -> Self {
        Self { min_height, level }
    }
}

/// The reference cascade, evaluated top-down, first match wins.
pub fn default_heading_rules() -> Vec<HeadingRule> {
    vec![
        HeadingRule::new(20.0, 1),
        HeadingRule::new(16.0, 2),
        HeadingRule::new(14.0, 3),
    ]
}

/// Geometric parameters of the layout reconstructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical bucket size; fragments whose `y` rounds to the same multiple
    /// share a line. Default: 5.
    pub bucket_size: f64,

    /// Horizontal gap (in page units) that must be *exceeded* before a space
    /// is inserted between two fragments. Default: 10.
    pub gap_threshold: f64,

    /// Ordered heading cascade. Default: `>20 → H1`, `>16 → H2`, `>14 → H3`.
    pub heading_rules: Vec<HeadingRule>,

    /// Block appended after every page. Default: horizontal rule.
    pub page_separator: PageSeparator,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bucket_size: DEFAULT_BUCKET_SIZE,
            gap_threshold: DEFAULT_GAP_THRESHOLD,
            heading_rules: default_heading_rules(),
            page_separator: PageSeparator::default(),
        }
    }
}

impl LayoutConfig {
    /// Check the thresholds are usable.
    pub fn validate(&self) -> Result<(), Layout2MdError> {
        if !self.bucket_size.is_finite() || self.bucket_size <= 0.0 {
            return Err(Layout2MdError::InvalidConfig(format!(
                "Bucket size must be a positive number, got {}",
                self.bucket_size
            )));
        }
        if !self.gap_threshold.is_finite() {
            return Err(Layout2MdError::InvalidConfig(format!(
                "Gap threshold must be finite, got {}",
                self.gap_threshold
            )));
        }
        for rule in &self.heading_rules {
            if !(1..=6).contains(&rule.level) {
                return Err(Layout2MdError::InvalidConfig(format!(
                    "Heading level must be 1–6, got {}",
                    rule.level
                )));
            }
            if !rule.min_height.is_finite() {
                return Err(Layout2MdError::InvalidConfig(format!(
                    "Heading threshold for level {} must be finite, got {}",
                    rule.level, rule.min_height
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for a conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_layout2md::{ConversionConfig, PageSelection};
///
/// let config = ConversionConfig::builder()
///     .gap_threshold(8.0)
///     .pages(PageSelection::Range(1, 3))
///     .build()
///     .unwrap();
/// assert_eq!(config.layout.bucket_size, 5.0);
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// Reconstruction thresholds and page separator.
    pub layout: LayoutConfig,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Include YAML front-matter with document metadata. Default: false.
    pub include_metadata: bool,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("layout", &self.layout)
            .field("pages", &self.pages)
            .field("include_metadata", &self.include_metadata)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn bucket_size(mut self, size: f64) -> Self {
        self.config.layout.bucket_size = size;
        self
    }

    pub fn gap_threshold(mut self, gap: f64) -> Self {
        self.config.layout.gap_threshold = gap;
        self
    }

    pub fn heading_rules(mut self, rules: Vec<HeadingRule>) -> Self {
        self.config.layout.heading_rules = rules;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.layout.page_separator = sep;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn include_metadata(mut self, v: bool) -> Self {
        self.config.include_metadata = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Layout2MdError> {
        self.config.layout.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the document to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed
    /// positions into the page sequence.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// The first page number the selection asks for (1-indexed), used when
    /// reporting a selection that matched nothing.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.first().copied().unwrap_or(0),
        }
    }
}

/// Block appended after each page of reconstructed Markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSeparator {
    /// Horizontal rule: "\n---\n\n" (default)
    #[default]
    HorizontalRule,
    /// Nothing; pages run together.
    None,
    /// HTML comment with page number: "\n<!-- page N -->\n\n"
    Comment,
    /// Custom string on its own block: "\n{s}\n\n"
    Custom(String),
}

impl PageSeparator {
    /// Render the separator string for the given page number (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::HorizontalRule => "\n---\n\n".to_string(),
            PageSeparator::None => String::new(),
            PageSeparator::Comment => format!("\n<!-- page {} -->\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n{}\n\n", s),
        }
    }
}
