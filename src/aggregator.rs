use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tracing::{error, info, warn};

use crate::cache::SectionCache;
use crate::config::{CategoryConfig, Config};
use crate::fetcher::SourceFetcher;
use crate::model::{CategoryResult, Dataset, Item};

/// Cap on merged items per category after dedup and sort.
pub const MAX_ITEMS_PER_CATEGORY: usize = 30;

/// Fans out over categories and their sources, merging results through
/// the section cache.
pub struct FeedAggregator {
    config: Arc<Config>,
    fetcher: SourceFetcher,
    cache: SectionCache,
}

impl FeedAggregator {
    pub fn new(config: Arc<Config>) -> Self {
        let fetcher = SourceFetcher::new(StdDuration::from_secs(config.fetch_timeout_secs));
        let cache = SectionCache::new(Duration::minutes(config.cache_ttl_mins));
        Self {
            config,
            fetcher,
            cache,
        }
    }

    /// Fetch every configured category concurrently.
    ///
    /// A failing category yields an empty result carrying its error
    /// message; siblings are unaffected. Only a configuration fault
    /// before fan-out fails the whole call.
    pub async fn fetch_all(&self) -> anyhow::Result<Dataset> {
        if self.config.categories.is_empty() {
            anyhow::bail!("no categories configured");
        }

        let results = join_all(self.config.categories.iter().map(|cat| self.section(cat))).await;

        let mut out = Dataset::new();
        for (cat, result) in self.config.categories.iter().zip(results) {
            match result {
                Ok(data) => {
                    out.insert(cat.key.clone(), data);
                }
                Err(e) => {
                    error!("Category '{}' failed: {}", cat.key, e);
                    out.insert(
                        cat.key.clone(),
                        CategoryResult {
                            key: cat.key.clone(),
                            items: Vec::new(),
                            fetched_at: Utc::now(),
                            error: Some(e.to_string()),
                        },
                    );
                }
            }
        }

        Ok(out)
    }

    /// Fetch one category, serving from the cache while its entry lives.
    ///
    /// All sources are fetched concurrently; a failing source contributes
    /// nothing. Only when every source of a non-empty category fails does
    /// the category itself error.
    pub async fn section(&self, cat: &CategoryConfig) -> anyhow::Result<CategoryResult> {
        if let Some(cached) = self.cache.get(&cat.key, Utc::now()).await {
            return Ok(cached);
        }

        let results = join_all(
            cat.sources
                .iter()
                .map(|src| self.fetcher.fetch_source(&src.url, &src.name, &cat.key)),
        )
        .await;

        let mut merged: Vec<Item> = Vec::new();
        let mut failures = 0;
        for (src, result) in cat.sources.iter().zip(results) {
            match result {
                Ok(items) => merged.extend(items),
                Err(e) => {
                    warn!("[rss] failed {}: {}", src.url, e);
                    failures += 1;
                }
            }
        }

        if failures > 0 && failures == cat.sources.len() {
            anyhow::bail!("all {} sources failed", failures);
        }

        let items = merge_items(merged);
        info!("Fetched {} items for category '{}'", items.len(), cat.key);

        let now = Utc::now();
        let data = CategoryResult {
            key: cat.key.clone(),
            items,
            fetched_at: now,
            error: None,
        };
        self.cache.insert(&cat.key, data.clone(), now).await;

        Ok(data)
    }
}

/// Deduplicate by link (first arrival wins, empty links dropped), order
/// newest first with undated items last, and cap the result.
pub fn merge_items(all: Vec<Item>) -> Vec<Item> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique: Vec<Item> = all
        .into_iter()
        .filter(|item| !item.link.is_empty() && seen.insert(item.link.clone()))
        .collect();

    // Stable sort: arrival order breaks timestamp ties
    unique.sort_by_key(|item| {
        std::cmp::Reverse(item.published.unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
    });
    unique.truncate(MAX_ITEMS_PER_CATEGORY);
    unique
}
