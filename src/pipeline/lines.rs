//! Line assembly: group fragments into visual rows and render their text.
//!
//! Three independent steps, each kept as its own explicit pass:
//!
//! 1. **Bucket** — every fragment's `y` is quantised to a multiple of the
//!    bucket size (`round_half_up(y / B)`). Fragments sharing a bucket share
//!    a line. This absorbs the small baseline jitter between glyph runs that
//!    sit on the same visual row.
//! 2. **Order lines** — bucket keys sorted *descending*. PDF space grows
//!    upwards, so the largest `y` is the top of the page.
//! 3. **Order fragments** — each bucket sorted *ascending* by `x`.
//!
//! Spacing between consecutive fragments is purely geometric: a single space
//! is inserted when the gap between the previous run's right edge and the
//! current run's origin exceeds the threshold. No dictionary, no content
//! heuristics.
//!
//! Every step is total over `f64`: huge and infinite coordinates keep rows
//! of their own, NaN rows sort after every other row, and nothing panics.

use crate::config::LayoutConfig;
use crate::document::{round_half_up, PositionedFragment};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A visual row of fragments, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    /// Quantised `y` of the row (`bucket * bucket_size`).
    pub y: f64,
    pub fragments: Vec<&'a PositionedFragment>,
}

impl<'a> Line<'a> {
    /// Arithmetic mean of the member heights.
    pub fn mean_height(&self) -> f64 {
        if self.fragments.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.fragments.iter().map(|f| f.height).sum();
        sum / self.fragments.len() as f64
    }

    /// Concatenate member texts, inserting a space wherever the horizontal
    /// gap to the previous fragment exceeds `gap_threshold`.
    pub fn text(&self, gap_threshold: f64) -> String {
        let mut text = String::new();
        let mut prev: Option<&PositionedFragment> = None;

        for &fragment in &self.fragments {
            if let Some(p) = prev {
                let gap = fragment.x - p.end_x();
                if gap > gap_threshold {
                    text.push(' ');
                }
            }
            text.push_str(&fragment.text);
            prev = Some(fragment);
        }

        text
    }
}

/// Quantised line key for a `y` coordinate: `round_half_up(y / B)`.
///
/// The key stays a float so that distinct rows never collapse, however large
/// `y` is. `-0.0` is folded into `0.0` and every NaN into one canonical NaN,
/// which gets a row of its own.
pub fn bucket_key(y: f64, bucket_size: f64) -> f64 {
    canonical(round_half_up(y / bucket_size))
}

/// Fold signed zeros and NaN payloads so equal values share one bit pattern.
fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Reading order of line keys: highest first, the NaN row last.
fn top_to_bottom(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(a),
    }
}

/// Left-to-right order of fragments; `-0.0` and `0.0` tie.
fn left_to_right(a: &PositionedFragment, b: &PositionedFragment) -> Ordering {
    canonical(a.x).total_cmp(&canonical(b.x))
}

/// Group a page's fragments into lines in reading order (top to bottom,
/// left to right within a line).
pub fn group_lines<'a>(fragments: &'a [PositionedFragment], config: &LayoutConfig) -> Vec<Line<'a>> {
    // Keyed by the bit pattern of the canonical key.
    let mut buckets: HashMap<u64, Vec<&'a PositionedFragment>> = HashMap::new();
    for fragment in fragments {
        buckets
            .entry(bucket_key(fragment.y, config.bucket_size).to_bits())
            .or_default()
            .push(fragment);
    }

    let mut keys: Vec<f64> = buckets.keys().map(|bits| f64::from_bits(*bits)).collect();
    keys.sort_unstable_by(top_to_bottom);

    keys.into_iter()
        .filter_map(|key| {
            let mut members = buckets.remove(&key.to_bits())?;
            // Stable: equal x keeps extraction order.
            members.sort_by(|a, b| left_to_right(a, b));
            Some(Line {
                y: key * config.bucket_size,
                fragments: members,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f64, y: f64, width: f64) -> PositionedFragment {
        PositionedFragment::new(text, x, y, width, 10.0)
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.text(10.0)).collect()
    }

    #[test]
    fn bucket_boundaries_follow_round_half_up() {
        assert_eq!(bucket_key(12.0, 5.0), 2.0);
        assert_eq!(bucket_key(13.0, 5.0), 3.0);
        assert_eq!(bucket_key(12.5, 5.0), 3.0);
        assert_eq!(bucket_key(-12.5, 5.0), -2.0);
        assert_eq!(bucket_key(-13.0, 5.0), -3.0);
    }

    #[test]
    fn bucket_key_is_total() {
        assert!(bucket_key(f64::NAN, 5.0).is_nan());
        assert_eq!(bucket_key(f64::INFINITY, 5.0), f64::INFINITY);
        assert_eq!(bucket_key(f64::NEG_INFINITY, 5.0), f64::NEG_INFINITY);
        assert_eq!(bucket_key(1e21, 5.0), 2e20);
        assert_eq!(bucket_key(10.0, 0.0), f64::INFINITY);
        assert!(bucket_key(0.0, 0.0).is_nan());
    }

    #[test]
    fn negative_zero_and_nan_keys_are_canonical() {
        assert_eq!(bucket_key(-1.0, 5.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(bucket_key(-0.0, 5.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(
            bucket_key(f64::NAN, 5.0).to_bits(),
            bucket_key(-f64::NAN, 5.0).to_bits()
        );
    }

    #[test]
    fn huge_rows_stay_apart_and_ordered() {
        let items = vec![
            frag("low", 0.0, 1e20, 5.0),
            frag("high", 0.0, 1e21, 5.0),
            frag("lowest", 0.0, -1e21, 5.0),
        ];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(texts(&lines), vec!["high", "low", "lowest"]);
    }

    #[test]
    fn infinite_rows_bracket_finite_ones() {
        let items = vec![
            frag("bottom", 0.0, f64::NEG_INFINITY, 5.0),
            frag("middle", 0.0, 0.0, 5.0),
            frag("top", 0.0, f64::INFINITY, 5.0),
        ];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(texts(&lines), vec!["top", "middle", "bottom"]);
    }

    #[test]
    fn nan_row_is_separate_and_last() {
        let items = vec![
            frag("nan", 100.0, f64::NAN, 5.0),
            frag("zero", 0.0, 0.0, 5.0),
            frag("other nan", 0.0, -f64::NAN, 5.0),
            frag("below", 0.0, -50.0, 5.0),
        ];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(texts(&lines), vec!["zero", "below", "other nan nan"]);
    }

    #[test]
    fn signed_zero_x_keeps_extraction_order() {
        let items = vec![frag("first", 0.0, 0.0, 0.0), frag("second", -0.0, 0.0, 0.0)];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(lines[0].text(10.0), "firstsecond");
    }

    #[test]
    fn jittered_baselines_share_a_line() {
        let items = vec![frag("a", 0.0, 101.0, 5.0), frag("b", 5.0, 99.0, 5.0)];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].y, 100.0);
        assert_eq!(lines[0].text(10.0), "ab");
    }

    #[test]
    fn lines_run_top_to_bottom() {
        let items = vec![
            frag("bottom", 0.0, 10.0, 30.0),
            frag("top", 0.0, 100.0, 30.0),
            frag("middle", 0.0, 50.0, 30.0),
        ];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(texts(&lines), vec!["top", "middle", "bottom"]);
    }

    #[test]
    fn fragments_run_left_to_right() {
        let items = vec![
            frag("c", 60.0, 0.0, 5.0),
            frag("a", 0.0, 0.0, 5.0),
            frag("b", 30.0, 0.0, 5.0),
        ];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(texts(&lines), vec!["a b c"]);
    }

    #[test]
    fn equal_x_keeps_extraction_order() {
        let items = vec![frag("first", 0.0, 0.0, 0.0), frag("second", 0.0, 0.0, 0.0)];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(lines[0].text(10.0), "firstsecond");
    }

    #[test]
    fn gap_must_exceed_threshold() {
        let at = vec![frag("a", 0.0, 0.0, 10.0), frag("b", 20.0, 0.0, 10.0)];
        let lines = group_lines(&at, &LayoutConfig::default());
        assert_eq!(lines[0].text(10.0), "ab");

        let past = vec![frag("a", 0.0, 0.0, 10.0), frag("b", 20.5, 0.0, 10.0)];
        let lines = group_lines(&past, &LayoutConfig::default());
        assert_eq!(lines[0].text(10.0), "a b");
    }

    #[test]
    fn gap_is_measured_from_previous_fragment_only() {
        // "b" is wide; "c" starts 12 units after "b"'s right edge.
        let items = vec![
            frag("a", 0.0, 0.0, 5.0),
            frag("b", 6.0, 0.0, 50.0),
            frag("c", 68.0, 0.0, 5.0),
        ];
        let lines = group_lines(&items, &LayoutConfig::default());
        assert_eq!(lines[0].text(10.0), "ab c");
    }

    #[test]
    fn overlapping_and_negative_geometry_never_adds_space() {
        let items = vec![frag("x", 10.0, 0.0, -30.0), frag("y", 0.0, 0.0, 50.0)];
        let lines = group_lines(&items, &LayoutConfig::default());
        // Sorted: y(0, w50) then x(10) → gap = 10 - 50 < 0.
        assert_eq!(lines[0].text(10.0), "yx");
    }

    #[test]
    fn nan_coordinates_do_not_panic() {
        let items = vec![
            frag("n", f64::NAN, f64::NAN, f64::NAN),
            frag("a", 0.0, 0.0, 5.0),
            frag("i", f64::INFINITY, f64::NEG_INFINITY, 1.0),
        ];
        let lines = group_lines(&items, &LayoutConfig::default());
        let total: usize = lines.iter().map(|l| l.fragments.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn mean_height_averages_members() {
        let a = PositionedFragment::new("a", 0.0, 0.0, 1.0, 20.0);
        let b = PositionedFragment::new("b", 1.0, 0.0, 1.0, 14.0);
        let line = Line {
            y: 0.0,
            fragments: vec![&a, &b],
        };
        assert_eq!(line.mean_height(), 17.0);

        let empty = Line {
            y: 0.0,
            fragments: vec![],
        };
        assert_eq!(empty.mean_height(), 0.0);
    }

    #[test]
    fn empty_page_has_no_lines() {
        assert!(group_lines(&[], &LayoutConfig::default()).is_empty());
    }
}
