use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::model::CategoryResult;

struct CacheEntry {
    data: CategoryResult,
    expires_at: DateTime<Utc>,
}

/// Per-category TTL cache for aggregated section results.
///
/// The current time is injected on every call so expiry is testable
/// without sleeping. Entries are lazily replaced on the next miss, never
/// proactively purged; the cache lives as long as the process.
///
/// `get` followed by `insert` across an await point is not atomic: two
/// concurrent misses for the same category may both fetch. The stored
/// result is idempotent, so the race is accepted.
pub struct SectionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl SectionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return the cached result for `key` if it has not expired.
    pub async fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CategoryResult> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.data.clone())
    }

    /// Store `data` under `key`, expiring one TTL from `now`.
    pub async fn insert(&self, key: &str, data: CategoryResult, now: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                expires_at: now + self.ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_for(key: &str, now: DateTime<Utc>) -> CategoryResult {
        CategoryResult {
            key: key.to_string(),
            items: Vec::new(),
            fetched_at: now,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_miss_on_empty_cache() {
        let cache = SectionCache::new(Duration::minutes(15));
        assert!(cache.get("ai", Utc::now()).await.is_none());
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = SectionCache::new(Duration::minutes(15));
        let now = Utc::now();

        cache.insert("ai", result_for("ai", now), now).await;

        let hit = cache.get("ai", now + Duration::minutes(14)).await;
        assert_eq!(hit.unwrap().key, "ai");
    }

    #[tokio::test]
    async fn test_miss_after_ttl() {
        let cache = SectionCache::new(Duration::minutes(15));
        let now = Utc::now();

        cache.insert("ai", result_for("ai", now), now).await;

        assert!(cache.get("ai", now + Duration::minutes(15)).await.is_none());
        assert!(cache.get("ai", now + Duration::minutes(16)).await.is_none());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = SectionCache::new(Duration::minutes(15));
        let now = Utc::now();

        cache.insert("ai", result_for("ai", now), now).await;

        assert!(cache.get("fashion", now).await.is_none());
        assert!(cache.get("ai", now).await.is_some());
    }

    #[tokio::test]
    async fn test_insert_replaces_expired_entry() {
        let cache = SectionCache::new(Duration::minutes(15));
        let now = Utc::now();

        cache.insert("ai", result_for("ai", now), now).await;
        let later = now + Duration::minutes(20);

        // Expired entry is invisible but still present until replaced
        assert!(cache.get("ai", later).await.is_none());

        cache.insert("ai", result_for("ai", later), later).await;
        assert_eq!(cache.get("ai", later).await.unwrap().fetched_at, later);
    }
}
