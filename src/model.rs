use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized headline from a syndication feed.
///
/// `link` doubles as the deduplication key; an empty link makes the item
/// non-clickable and drops it from the merged category output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    /// Parsed publish timestamp. `None` when the feed carried no usable
    /// date; such items sort after everything else and never count as new.
    pub published: Option<DateTime<Utc>>,
    pub source: String,
    pub category_key: String,
}

/// The merged, deduplicated, newest-first result for one category.
/// Replaced wholesale on the next successful aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResult {
    pub key: String,
    pub items: Vec<Item>,
    pub fetched_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full dataset: one entry per configured category, always present.
pub type Dataset = HashMap<String, CategoryResult>;

/// The closed set of teletext colors. Config parsing rejects anything
/// outside this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    Dim,
    Orange,
    Pink,
}

impl Color {
    /// CSS value for renderers.
    pub fn css(self) -> &'static str {
        match self {
            Color::Black => "#000000",
            Color::Red => "#FF3333",
            Color::Green => "#00FF66",
            Color::Yellow => "#FFEE00",
            Color::Blue => "#4488FF",
            Color::Magenta => "#FF00FF",
            Color::Cyan => "#00FFFF",
            Color::White => "#FFFFFF",
            Color::Gray => "#888888",
            Color::Dim => "#444444",
            Color::Orange => "#FF8800",
            Color::Pink => "#FF66CC",
        }
    }
}
