//! Page composition: pure mappings from (page number, dataset, now) to a
//! 24-row teletext grid. No I/O happens here.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

use crate::config::{CategoryConfig, Config, ABOUT_PAGE, HOME_PAGE};
use crate::grid::{
    centre, empty_row, header_row, nav_hint_row, pad, section_bar, seg, seg_link, separator,
    truncate_ellipsis, Row, COLS, ROWS,
};
use crate::model::{Color, Dataset, Item};

const OPEN_TAG: &str = "[OPEN]";

/// Build the grid for any requested page number. Unknown pages render the
/// not-found page rather than failing. Always returns exactly [`ROWS`] rows.
pub fn build_page(page: u16, config: &Config, data: &Dataset, now: DateTime<Utc>) -> Vec<Row> {
    match page {
        HOME_PAGE => home(config, data, now),
        ABOUT_PAGE => about(config, now),
        _ => match config.category_for_page(page) {
            Some(cat) => match page - cat.page {
                0 => section_top(cat, data, now),
                1 => section_new(cat, data, now),
                2 => section_signals(cat, data, now),
                3 => section_sources(cat, data, now),
                _ => not_found(page, config, now),
            },
            None => not_found(page, config, now),
        },
    }
}

// ─── Time helpers ────────────────────────────────────────────────────────────

/// Recency display for an item: clock time within a day, weekday within a
/// week, date otherwise. Undated items show the placeholder.
pub fn format_time(item: &Item, now: DateTime<Utc>) -> String {
    let Some(t) = item.published else {
        return "??:??".to_string();
    };
    let age = now.signed_duration_since(t);
    if age < Duration::hours(24) {
        t.format("%H:%M").to_string()
    } else if age < Duration::days(7) {
        t.format("%a %d %b").to_string().to_uppercase()
    } else {
        t.format("%d %b").to_string().to_uppercase()
    }
}

/// Published within the last 24 hours. Undated items are never new.
pub fn is_new_today(item: &Item, now: DateTime<Utc>) -> bool {
    item.published
        .map(|t| now.signed_duration_since(t) < Duration::hours(24))
        .unwrap_or(false)
}

// ─── Headline pair ───────────────────────────────────────────────────────────

/// The two-row headline unit used on section pages:
/// `  ■ TITLE…            [NEW]` over `    SOURCE        HH:MM     [OPEN]`.
fn headline_pair(item: &Item, color: Color, is_new: bool, now: DateTime<Utc>) -> Vec<Row> {
    const PREFIX: &str = "  ■ "; // 4 cells
    let badge = if is_new { " [NEW]" } else { "" };
    let max_title = COLS - 4 - badge.chars().count();
    let title = pad(&truncate_ellipsis(&item.title, max_title), max_title);

    let mut title_segs = vec![
        seg(PREFIX, color, Color::Black),
        seg(title, Color::White, Color::Black),
    ];
    if !badge.is_empty() {
        title_segs.push(seg(badge, Color::Yellow, Color::Black));
    }

    let source = pad(&item.source, 13);
    let time_str = pad(&format_time(item, now), 5);
    let fill = COLS - 4 - 13 - 2 - 5 - OPEN_TAG.chars().count();

    let open_seg = if item.link.is_empty() {
        seg(OPEN_TAG, Color::Red, Color::Black)
    } else {
        seg_link(OPEN_TAG, Color::Red, Color::Black, item.link.clone())
    };

    let meta_segs = vec![
        seg("    ", Color::Black, Color::Black),
        seg(source, Color::Gray, Color::Black),
        seg("  ", Color::Gray, Color::Black),
        seg(time_str, Color::Gray, Color::Black),
        seg(" ".repeat(fill), Color::Black, Color::Black),
        open_seg,
    ];
    let meta_row = if item.link.is_empty() {
        Row::new(meta_segs)
    } else {
        Row::linked(meta_segs, item.link.clone())
    };

    vec![Row::new(title_segs), meta_row]
}

fn full_width(text: &str, fg: Color) -> Row {
    Row::new(vec![seg(pad(text, COLS), fg, Color::Black)])
}

// ─── Home page (100) ─────────────────────────────────────────────────────────

fn home(config: &Config, data: &Dataset, now: DateTime<Utc>) -> Vec<Row> {
    let mut rows = vec![header_row(HOME_PAGE, now)];

    rows.push(Row::new(vec![seg(
        centre("  Z E E F A X", COLS),
        Color::Yellow,
        Color::Blue,
    )]));
    rows.push(Row::new(vec![seg(
        centre("RETRO NEWS TERMINAL", COLS),
        Color::White,
        Color::Blue,
    )]));

    for (i, cat) in config.categories.iter().enumerate() {
        rows.push(section_bar(&cat.short_name, cat.page, cat.color));

        match data.get(&cat.key).and_then(|r| r.items.first()) {
            None => rows.push(full_width("  No items available", Color::Gray)),
            Some(item) => rows.push(home_headline(item, cat.color)),
        }

        if i + 1 < config.categories.len() && rows.len() < 22 {
            rows.push(empty_row());
        }
    }

    while rows.len() < 23 {
        rows.push(empty_row());
    }
    rows.push(nav_hint_row("TYPE PAGE NUMBER ─ ◄ PREV   NEXT ►"));
    rows.truncate(ROWS);
    rows
}

fn home_headline(item: &Item, color: Color) -> Row {
    let max_title = COLS - 2 - OPEN_TAG.chars().count() - 1;
    let title = pad(&truncate_ellipsis(&item.title, max_title), max_title);

    let open_seg = if item.link.is_empty() {
        seg(OPEN_TAG, Color::Red, Color::Black)
    } else {
        seg_link(OPEN_TAG, Color::Red, Color::Black, item.link.clone())
    };

    let segs = vec![
        seg("  ", Color::White, Color::Black),
        seg(title, color, Color::Black),
        seg(" ", Color::Black, Color::Black),
        open_seg,
    ];
    if item.link.is_empty() {
        Row::new(segs)
    } else {
        Row::linked(segs, item.link.clone())
    }
}

// ─── Section subpages ────────────────────────────────────────────────────────

fn section_top(cat: &CategoryConfig, data: &Dataset, now: DateTime<Utc>) -> Vec<Row> {
    let items = data.get(&cat.key).map(|r| r.items.as_slice()).unwrap_or(&[]);

    let mut rows = vec![
        header_row(cat.page, now),
        section_bar(
            &format!("{}  ─  TOP HEADLINES", cat.short_name),
            cat.page,
            cat.color,
        ),
        separator(),
    ];

    if items.is_empty() {
        rows.push(full_width("  NO FEEDS LOADED — REFRESH TO RETRY", Color::Red));
    } else {
        push_headline_pairs(&mut rows, items, cat.color, now, |item| {
            is_new_today(item, now)
        });
    }

    finish(
        rows,
        &format!(
            "{}:NEW  {}:SIGNALS  {}:SOURCES",
            cat.page + 1,
            cat.page + 2,
            cat.page + 3
        ),
    )
}

fn section_new(cat: &CategoryConfig, data: &Dataset, now: DateTime<Utc>) -> Vec<Row> {
    let all = data.get(&cat.key).map(|r| r.items.as_slice()).unwrap_or(&[]);
    let items: Vec<&Item> = all.iter().filter(|i| is_new_today(i, now)).collect();

    let mut rows = vec![
        header_row(cat.page + 1, now),
        section_bar(
            &format!("{}  ─  NEW TODAY", cat.short_name),
            cat.page + 1,
            cat.color,
        ),
        separator(),
    ];

    if items.is_empty() {
        rows.push(full_width("  NOTHING NEW IN THE LAST 24 HOURS", Color::Gray));
    } else {
        'outer: for item in items {
            if rows.len() >= 22 {
                break;
            }
            for row in headline_pair(item, cat.color, true, now) {
                if rows.len() >= 22 {
                    break 'outer;
                }
                rows.push(row);
            }
        }
    }

    finish(
        rows,
        &format!(
            "{}:ALL  {}:SIGNALS  {}:SOURCES",
            cat.page,
            cat.page + 2,
            cat.page + 3
        ),
    )
}

fn section_signals(cat: &CategoryConfig, data: &Dataset, now: DateTime<Utc>) -> Vec<Row> {
    let all = data.get(&cat.key).map(|r| r.items.as_slice()).unwrap_or(&[]);
    let considered = &all[..all.len().min(20)];

    let mut rows = vec![
        header_row(cat.page + 2, now),
        section_bar(
            &format!("{}  ─  SIGNALS", cat.short_name),
            cat.page + 2,
            cat.color,
        ),
        separator(),
        full_width("  AUTO-EXTRACTED TREND SIGNALS:", cat.color),
        empty_row(),
    ];

    let signals = extract_signals(considered);

    for signal in signals.iter().take(14) {
        if rows.len() >= 22 {
            break;
        }
        rows.push(Row::new(vec![
            seg("  ▶ ", cat.color, Color::Black),
            seg(pad(signal, COLS - 4), Color::White, Color::Black),
        ]));
    }

    if signals.is_empty() {
        rows.push(full_width("  NOT ENOUGH DATA YET", Color::Gray));
    }

    finish(
        rows,
        &format!(
            "{}:ALL  {}:NEW  {}:SOURCES",
            cat.page,
            cat.page + 1,
            cat.page + 3
        ),
    )
}

fn section_sources(cat: &CategoryConfig, data: &Dataset, now: DateTime<Utc>) -> Vec<Row> {
    let result = data.get(&cat.key);

    let mut rows = vec![
        header_row(cat.page + 3, now),
        section_bar(
            &format!("{}  ─  SOURCES", cat.short_name),
            cat.page + 3,
            cat.color,
        ),
        separator(),
        full_width("  FEEDS POWERING THIS SECTION:", cat.color),
        empty_row(),
    ];

    for src in &cat.sources {
        let url = src
            .url
            .strip_prefix("https://")
            .or_else(|| src.url.strip_prefix("http://"))
            .unwrap_or(&src.url);
        rows.push(Row::new(vec![
            seg("  ● ", cat.color, Color::Black),
            seg(pad(&src.name, 15), Color::White, Color::Black),
            seg("  ", Color::Black, Color::Black),
            seg(pad(url, 19), Color::Gray, Color::Black),
        ]));
    }

    rows.push(empty_row());

    if let Some(result) = result {
        let time_str = result.fetched_at.format("%H:%M");
        rows.push(full_width(
            &format!("  LAST FETCHED: {}", time_str),
            Color::Gray,
        ));
    }
    rows.push(full_width("  CACHE: 15 MIN  HEADLINE+LINK ONLY", Color::Gray));
    rows.push(empty_row());

    if let Some(error) = result.and_then(|r| r.error.as_deref()) {
        let short: String = error.chars().take(30).collect();
        rows.push(full_width(&format!("  ERROR: {}", short), Color::Red));
    }

    finish(
        rows,
        &format!(
            "{}:ALL  {}:NEW  {}:SIGNALS",
            cat.page,
            cat.page + 1,
            cat.page + 2
        ),
    )
}

/// Emit headline pairs until row 22; a pair may be split by the cap.
fn push_headline_pairs<F>(rows: &mut Vec<Row>, items: &[Item], color: Color, now: DateTime<Utc>, is_new: F)
where
    F: Fn(&Item) -> bool,
{
    'outer: for item in items {
        if rows.len() >= 22 {
            break;
        }
        for row in headline_pair(item, color, is_new(item), now) {
            if rows.len() >= 22 {
                break 'outer;
            }
            rows.push(row);
        }
    }
}

/// Pad to row 23, add the hint row, clamp to the grid height.
fn finish(mut rows: Vec<Row>, hint: &str) -> Vec<Row> {
    while rows.len() < 23 {
        rows.push(empty_row());
    }
    rows.push(nav_hint_row(hint));
    rows.truncate(ROWS);
    rows
}

// ─── About page (199) ────────────────────────────────────────────────────────

fn about(config: &Config, now: DateTime<Utc>) -> Vec<Row> {
    let mut rows = vec![
        header_row(ABOUT_PAGE, now),
        Row::new(vec![seg(
            centre("ABOUT ZEEFAX", COLS),
            Color::Yellow,
            Color::Blue,
        )]),
        separator(),
    ];

    let mut lines = vec![
        String::new(),
        "  ZEEFAX IS A RETRO TELETEXT-STYLE".to_string(),
        "  NEWS AGGREGATOR. NO ALGORITHMS.".to_string(),
        "  NO TRACKING. JUST HEADLINES.".to_string(),
        String::new(),
        "  NAVIGATE WITH PAGE NUMBERS:".to_string(),
        format!("  {}  HOME", HOME_PAGE),
    ];
    for cat in &config.categories {
        lines.push(format!("  {}  {}", cat.page, cat.name.to_uppercase()));
    }
    lines.extend([
        String::new(),
        "  ADD +1 FOR NEW TODAY".to_string(),
        "  ADD +2 FOR SIGNALS".to_string(),
        "  ADD +3 FOR SOURCES".to_string(),
        String::new(),
        "  HEADLINES ONLY. CLICK [OPEN] TO".to_string(),
        "  READ THE ORIGINAL ARTICLE.".to_string(),
    ]);

    for line in lines {
        if rows.len() >= 23 {
            break;
        }
        rows.push(full_width(&line, Color::White));
    }

    let hint = match config.categories.as_slice() {
        [] => format!("{}:HOME", HOME_PAGE),
        [first, ..] => format!(
            "{}:HOME  {}:{}",
            HOME_PAGE,
            first.page,
            first.key.to_uppercase()
        ),
    };
    finish(rows, &hint)
}

// ─── Not-found page ──────────────────────────────────────────────────────────

fn not_found(page: u16, config: &Config, now: DateTime<Utc>) -> Vec<Row> {
    let mut rows = vec![
        header_row(page, now),
        Row::new(vec![seg(
            centre("PAGE NOT FOUND", COLS),
            Color::Red,
            Color::Black,
        )]),
        separator(),
        empty_row(),
        Row::new(vec![seg(
            centre(&format!("PAGE {} DOES NOT EXIST", page), COLS),
            Color::Yellow,
            Color::Black,
        )]),
        empty_row(),
        Row::new(vec![seg(
            centre("VALID PAGES:", COLS),
            Color::White,
            Color::Black,
        )]),
        empty_row(),
        Row::new(vec![seg(
            centre(&format!("{}  HOME", HOME_PAGE), COLS),
            Color::Cyan,
            Color::Black,
        )]),
    ];

    for cat in &config.categories {
        if rows.len() >= 22 {
            break;
        }
        rows.push(Row::new(vec![seg(
            centre(&format!("{}  {}", cat.page, cat.name.to_uppercase()), COLS),
            cat.color,
            Color::Black,
        )]));
    }
    rows.push(Row::new(vec![seg(
        centre(&format!("{}  ABOUT", ABOUT_PAGE), COLS),
        Color::Gray,
        Color::Black,
    )]));

    finish(rows, "TYPE A 3-DIGIT PAGE NUMBER")
}

// ─── Signal extraction ───────────────────────────────────────────────────────

static SIGNAL_STRIP: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"[^a-z0-9\s-]").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "may", "might", "this", "that", "these",
        "those", "it", "its", "as", "not", "no", "new", "how", "what", "which", "who", "when",
        "where", "why", "all", "also", "into", "about", "up", "out", "use", "using", "used", "via",
        "can", "over", "after", "more", "than", "large", "model", "models", "paper", "research",
        "based", "through",
    ]
    .into_iter()
    .collect()
});

/// Frequency-ranked keywords from the given headlines, rendered as
/// `LABEL               ██ (2)` bullet strings.
///
/// Tokens of three or fewer characters and stop-words are discarded; a
/// token needs at least two occurrences to qualify. Ranking is a stable
/// sort by count, so ties keep first-encounter order.
pub fn extract_signals(items: &[Item]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut encounter_order: Vec<String> = Vec::new();

    for item in items {
        let lowered = item.title.to_lowercase();
        let cleaned = SIGNAL_STRIP.replace_all(&lowered, " ");
        for word in cleaned.split_whitespace() {
            if word.chars().count() <= 3 || STOP_WORDS.contains(word) {
                continue;
            }
            let count = counts.entry(word.to_string()).or_insert(0);
            if *count == 0 {
                encounter_order.push(word.to_string());
            }
            *count += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = encounter_order
        .into_iter()
        .map(|word| {
            let count = counts[&word];
            (word, count)
        })
        .filter(|(_, count)| *count >= 2)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(15);

    ranked
        .into_iter()
        .map(|(word, count)| {
            let bar = "█".repeat(count.min(8));
            format!("{}  {} ({})", pad(&word.to_uppercase(), 20), bar, count)
        })
        .collect()
}
