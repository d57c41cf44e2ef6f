//! Input data model: positioned text fragments grouped into pages.
//!
//! These types describe exactly what an external PDF text-extraction engine
//! hands to the reconstructor. Nothing here knows how to open a PDF; a page is
//! just an ordered bag of glyph runs with coordinates in PDF space (origin at
//! the bottom-left, `y` growing towards the top of the page).
//!
//! Two record shapes are accepted when deserialising:
//!
//! * [`PositionedFragment`] — already normalised (`x`, `y`, `width`, `height`,
//!   `text`, `font`).
//! * [`TextRun`] — the raw text-layer item (`str`, `transform`, `width`,
//!   `height`, `fontName`) as emitted by pdf.js-style engines. It is
//!   normalised on the way in via `From<TextRun> for PositionedFragment`.

use serde::{Deserialize, Serialize};

/// Round to the nearest integer, ties towards positive infinity:
/// `2.5 → 3`, `-2.5 → -2`.
///
/// Works on the exact fractional part rather than `(v + 0.5).floor()`, which
/// rounds `0.49999999999999994` up and is off by one for odd values past
/// 2^52. NaN and infinities pass through unchanged.
pub(crate) fn round_half_up(v: f64) -> f64 {
    let floor = v.floor();
    if v - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// One glyph run on a PDF page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedFragment {
    /// Literal glyph string, kept verbatim (may be empty or whitespace-only).
    #[serde(alias = "str")]
    pub text: String,
    /// Baseline origin, horizontal.
    pub x: f64,
    /// Baseline origin, vertical (PDF space, increasing upwards).
    pub y: f64,
    /// Advance width of the run.
    pub width: f64,
    /// Font-size-derived vertical measure.
    pub height: f64,
    /// Opaque font identifier.
    #[serde(alias = "fontName", default)]
    pub font: String,
}

impl PositionedFragment {
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
            font: String::new(),
        }
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Right edge of the run (`x + width`).
    pub fn end_x(&self) -> f64 {
        self.x + self.width
    }
}

/// A raw text-layer item before normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(rename = "str")]
    pub text: String,
    /// Text rendering matrix `[a, b, c, d, e, f]`; `e`/`f` are the origin.
    pub transform: [f64; 6],
    pub width: f64,
    /// Raw height as reported by the engine (often scaled by the matrix).
    pub height: f64,
    #[serde(rename = "fontName", default)]
    pub font: String,
}

impl TextRun {
    /// Vertical scale of the rendering matrix, `hypot(c, d)`.
    pub fn font_scale(&self) -> f64 {
        self.transform[2].hypot(self.transform[3])
    }

    /// Height divided by the matrix scale, falling back to the raw height
    /// when the ratio is not above 1.
    pub fn normalized_height(&self) -> f64 {
        let ratio = self.height / self.font_scale();
        if ratio > 1.0 {
            ratio
        } else {
            self.height
        }
    }
}

impl From<TextRun> for PositionedFragment {
    fn from(run: TextRun) -> Self {
        let height = round_half_up(run.normalized_height());
        Self {
            x: round_half_up(run.transform[4]),
            y: round_half_up(run.transform[5]),
            width: round_half_up(run.width),
            height,
            text: run.text,
            font: run.font,
        }
    }
}

/// Either record shape; the raw run is tried first because it is the only
/// one carrying a `transform`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FragmentRecord {
    Run(TextRun),
    Positioned(PositionedFragment),
}

impl From<FragmentRecord> for PositionedFragment {
    fn from(record: FragmentRecord) -> Self {
        match record {
            FragmentRecord::Run(run) => run.into(),
            FragmentRecord::Positioned(fragment) => fragment,
        }
    }
}

#[derive(Deserialize)]
struct RawPage {
    #[serde(default)]
    index: usize,
    #[serde(default)]
    items: Vec<FragmentRecord>,
}

/// The fragments of one source page, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPage")]
pub struct Page {
    /// Zero-based page index.
    pub index: usize,
    pub items: Vec<PositionedFragment>,
}

impl From<RawPage> for Page {
    fn from(raw: RawPage) -> Self {
        Self {
            index: raw.index,
            items: raw.items.into_iter().map(PositionedFragment::from).collect(),
        }
    }
}

impl Page {
    pub fn new(index: usize, items: Vec<PositionedFragment>) -> Self {
        Self { index, items }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Pages(Vec<Page>),
    Document {
        #[serde(default)]
        title: Option<String>,
        pages: Vec<Page>,
    },
}

/// A whole fragment dump as loaded from disk or memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct FragmentDocument {
    /// Document title, if the dump carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub pages: Vec<Page>,
}

impl From<RawDocument> for FragmentDocument {
    fn from(raw: RawDocument) -> Self {
        match raw {
            RawDocument::Pages(pages) => Self { title: None, pages },
            RawDocument::Document { title, pages } => Self { title, pages },
        }
    }
}

impl FragmentDocument {
    /// Total number of fragments across all pages.
    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_up_goes_towards_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn round_half_up_is_exact_at_the_edges() {
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        let odd = 4_503_599_627_370_497.0; // 2^52 + 1
        assert_eq!(round_half_up(odd), odd);
        assert_eq!(round_half_up(1e21), 1e21);
        assert_eq!(round_half_up(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_half_up(f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert!(round_half_up(f64::NAN).is_nan());
    }

    #[test]
    fn text_run_normalises_scaled_height() {
        // 12pt text with a 2x matrix: raw height 24, scale 2 → ratio 12.
        let run = TextRun {
            text: "Title".into(),
            transform: [2.0, 0.0, 0.0, 2.0, 72.4, 700.6],
            width: 80.2,
            height: 24.0,
            font: "g_d0_f1".into(),
        };
        let f = PositionedFragment::from(run);
        assert_eq!(f.x, 72.0);
        assert_eq!(f.y, 701.0);
        assert_eq!(f.width, 80.0);
        assert_eq!(f.height, 12.0);
        assert_eq!(f.font, "g_d0_f1");
    }

    #[test]
    fn text_run_keeps_raw_height_when_ratio_not_above_one() {
        // Typical pdf.js item: height == font size, matrix scale == font size.
        let run = TextRun {
            text: "body".into(),
            transform: [11.0, 0.0, 0.0, 11.0, 0.0, 0.0],
            width: 20.0,
            height: 11.0,
            font: String::new(),
        };
        assert_eq!(PositionedFragment::from(run).height, 11.0);
    }

    #[test]
    fn text_run_with_degenerate_matrix_falls_back_to_raw_height() {
        let run = TextRun {
            text: String::new(),
            transform: [0.0; 6],
            width: 0.0,
            height: 0.0,
            font: String::new(),
        };
        // 0 / 0 is NaN, which is not > 1.
        assert_eq!(PositionedFragment::from(run).height, 0.0);
    }

    #[test]
    fn deserialises_both_record_shapes() {
        let json = r#"[
            {"index": 0, "items": [
                {"text": "Hello", "x": 0, "y": 100, "width": 20, "height": 10},
                {"str": "World", "transform": [10, 0, 0, 10, 40.2, 99.6],
                 "width": 30, "height": 10, "fontName": "F1"}
            ]}
        ]"#;
        let doc: FragmentDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.title, None);
        assert_eq!(doc.pages.len(), 1);
        let items = &doc.pages[0].items;
        assert_eq!(items[0], PositionedFragment::new("Hello", 0.0, 100.0, 20.0, 10.0));
        assert_eq!(items[1].text, "World");
        assert_eq!(items[1].x, 40.0);
        assert_eq!(items[1].y, 100.0);
        assert_eq!(items[1].font, "F1");
    }

    #[test]
    fn deserialises_titled_document_object() {
        let json = r#"{"title": "Annual Report", "pages": [{"items": []}, {"index": 1}]}"#;
        let doc: FragmentDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Annual Report"));
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].index, 1);
        assert_eq!(doc.fragment_count(), 0);
    }

    #[test]
    fn with_font_sets_the_font_and_serialises_it() {
        let f = PositionedFragment::new("Hi", 1.0, 2.0, 3.0, 4.0).with_font("Helvetica-Bold");
        assert_eq!(f.font, "Helvetica-Bold");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["font"], "Helvetica-Bold");
        assert_eq!(json["text"], "Hi");
    }

    #[test]
    fn fragment_text_alias_accepts_str() {
        let json = r#"{"str": "  ", "x": 1, "y": 2, "width": 3, "height": 4, "fontName": "F2"}"#;
        let f: PositionedFragment = serde_json::from_str(json).unwrap();
        assert_eq!(f.text, "  ");
        assert_eq!(f.font, "F2");
        assert_eq!(f.end_x(), 4.0);
    }
}
