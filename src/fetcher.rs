use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::parser;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::debug;

use crate::model::Item;

/// Per-source cap on entries taken from a single feed, applied before the
/// category-level merge.
pub const MAX_ITEMS_PER_SOURCE: usize = 20;

const ACCEPT_HEADER: &str =
    "application/rss+xml, application/atom+xml, text/xml, application/xml";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed parse failed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Retrieves and normalizes a single syndication feed.
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("ZEEFAX/1.0 (news aggregator; headline-only)")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch one feed URL and map its entries into normalized items.
    ///
    /// Any failure (network, timeout, parse) surfaces as a `FetchError`;
    /// the aggregator isolates it so one bad source never takes down its
    /// category.
    pub async fn fetch_source(
        &self,
        url: &str,
        source_name: &str,
        category_key: &str,
    ) -> Result<Vec<Item>, FetchError> {
        debug!("Fetching feed: {} ({})", source_name, url);

        let response = self
            .client
            .get(url)
            .header("Accept", ACCEPT_HEADER)
            .send()
            .await?;
        let bytes = response.bytes().await?;
        let parsed = parser::parse(&bytes[..])?;

        let items = parsed
            .entries
            .into_iter()
            .take(MAX_ITEMS_PER_SOURCE)
            .map(|entry| {
                let raw_title = entry
                    .title
                    .as_ref()
                    .map(|t| t.content.clone())
                    .unwrap_or_else(|| "Untitled".to_string());

                // Fall back to the guid when no explicit link is present
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_else(|| entry.id.clone());

                let published: Option<DateTime<Utc>> = entry.published.or(entry.updated);

                Item {
                    title: clean_title(&raw_title),
                    link,
                    published,
                    source: source_name.to_string(),
                    category_key: category_key.to_string(),
                }
            })
            .collect();

        Ok(items)
    }
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip markup tags, decode the common HTML entities and collapse
/// whitespace. `&amp;` is decoded first, matching the upstream feeds'
/// (sometimes double-escaped) conventions.
pub fn clean_title(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, "");
    let decoded = stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    WS_RE.replace_all(&decoded, " ").trim().to_string()
}
