//! Formatting primitives for the 40-column teletext grid.
//!
//! All widths are counted in characters, not bytes; the box-drawing and
//! block characters used throughout are multi-byte in UTF-8.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Color;

/// Grid width in character cells.
pub const COLS: usize = 40;
/// Rows per page: 0 is the header, 23 the last content row. The footer
/// is a separate row composed via [`footer_row`].
pub const ROWS: usize = 24;

// ─── String padding / truncation ─────────────────────────────────────────────

/// Pad/truncate `s` to exactly `n` chars.
pub fn pad(s: &str, n: usize) -> String {
    let len = s.chars().count();
    if len >= n {
        return s.chars().take(n).collect();
    }
    let mut out = String::with_capacity(n);
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(n - len));
    out
}

/// Right-align `s` within `n` chars. An over-long string keeps its first
/// `n` chars, not its tail.
pub fn pad_left(s: &str, n: usize) -> String {
    let len = s.chars().count();
    if len >= n {
        return s.chars().take(n).collect();
    }
    let mut out = String::with_capacity(n);
    out.extend(std::iter::repeat(' ').take(n - len));
    out.push_str(s);
    out
}

/// Centre `s` within `n` chars, splitting the slack floor/ceil.
pub fn centre(s: &str, n: usize) -> String {
    let len = s.chars().count();
    if len >= n {
        return s.chars().take(n).collect();
    }
    let total = n - len;
    let left = total / 2;
    let right = total - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

/// Shorten `s` to `budget` chars, replacing the overflow with a single
/// ellipsis. A string exactly at budget passes through unchanged.
pub fn truncate_ellipsis(s: &str, budget: usize) -> String {
    if budget == 0 {
        return String::new();
    }
    if s.chars().count() <= budget {
        return s.to_string();
    }
    let mut out: String = s.chars().take(budget - 1).collect();
    out.push('…');
    out
}

// ─── Segments and rows ───────────────────────────────────────────────────────

/// A contiguous run of uniformly styled text. Segment texts in a row must
/// sum to exactly [`COLS`] chars; every composer upholds this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub segments: Vec<Segment>,
    /// When set, the whole row acts as the click affordance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_link: Option<String>,
}

impl Row {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            row_link: None,
        }
    }

    pub fn linked(segments: Vec<Segment>, link: impl Into<String>) -> Self {
        Self {
            segments,
            row_link: Some(link.into()),
        }
    }

    /// Total width of the row in character cells.
    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }
}

pub fn seg(text: impl Into<String>, fg: Color, bg: Color) -> Segment {
    Segment {
        text: text.into(),
        fg,
        bg,
        bold: false,
        link: None,
    }
}

pub fn seg_link(text: impl Into<String>, fg: Color, bg: Color, link: impl Into<String>) -> Segment {
    Segment {
        text: text.into(),
        fg,
        bg,
        bold: false,
        link: Some(link.into()),
    }
}

// ─── Composite row builders ──────────────────────────────────────────────────

/// Full-width blank row.
pub fn empty_row() -> Row {
    Row::new(vec![seg(" ".repeat(COLS), Color::White, Color::Black)])
}

/// Full-width horizontal rule.
pub fn separator() -> Row {
    Row::new(vec![seg("─".repeat(COLS), Color::Dim, Color::Black)])
}

/// Header row at row 0: `ZEEFAX` | centred date and clock | `P.nnn`.
pub fn header_row(page: u16, now: DateTime<Utc>) -> Row {
    let date_str = now.format("%a %d %b %Y").to_string().to_uppercase();
    let time_str = now.format("%H:%M").to_string();

    let left = pad("ZEEFAX", 7);
    let right = pad_left(&format!("P.{}", page), 5);
    let mid = centre(
        &format!("{}  {}", date_str, time_str),
        COLS - left.chars().count() - right.chars().count(),
    );

    Row::new(vec![
        seg(left, Color::Yellow, Color::Blue),
        seg(mid, Color::White, Color::Blue),
        seg(right, Color::Cyan, Color::Blue),
    ])
}

/// Colour-coded section title bar spanning the full width.
pub fn section_bar(label: &str, page: u16, color: Color) -> Row {
    let page_str = page.to_string();
    let inner = COLS - 4;
    let title = pad(label, inner - page_str.chars().count() - 1);
    Row::new(vec![
        seg(" ", color, Color::Black),
        seg(
            pad(&format!(" {} {} ", title, page_str), COLS - 1),
            Color::Black,
            color,
        ),
    ])
}

/// Centred gray hint row used at row 23 of every page.
pub fn nav_hint_row(text: &str) -> Row {
    Row::new(vec![seg(centre(text, COLS), Color::Gray, Color::Black)])
}

/// The footer row below the grid, supplied to the renderer separately
/// from the 24 content rows.
pub fn footer_row(prev: Option<u16>, next: Option<u16>) -> Row {
    let prev_str = prev.map(|p| format!("◄{}", p)).unwrap_or_default();
    let next_str = next.map(|p| format!("{}►", p)).unwrap_or_default();

    let left_w = 5;
    let right_w = 5;
    let mid = centre("PAGE ___", COLS - left_w - right_w);

    Row::new(vec![
        seg(pad(&prev_str, left_w), Color::Cyan, Color::Dim),
        seg(mid, Color::Yellow, Color::Dim),
        seg(pad_left(&next_str, right_w), Color::Cyan, Color::Dim),
    ])
}
