use serde::Deserialize;
use std::path::Path;

use crate::model::Color;

pub const HOME_PAGE: u16 = 100;
pub const ABOUT_PAGE: u16 = 199;

/// Each category owns a block of ten page numbers starting at its base
/// page; only the first four are used today (top, new, signals, sources).
pub const PAGES_PER_CATEGORY: u16 = 10;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Per-source fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Section cache lifetime in minutes
    #[serde(default = "default_cache_ttl_mins")]
    pub cache_ttl_mins: i64,
    pub categories: Vec<CategoryConfig>,
}

fn default_fetch_timeout_secs() -> u64 {
    9
}

fn default_cache_ttl_mins() -> i64 {
    15
}

#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    pub key: String,
    /// Base page number, e.g. 110
    pub page: u16,
    pub name: String,
    /// Short label for the section bar
    pub short_name: String,
    pub color: Color,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub url: String,
    pub name: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn category(&self, key: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Resolve the category owning `page` via its reserved ten-page window.
    pub fn category_for_page(&self, page: u16) -> Option<&CategoryConfig> {
        self.categories
            .iter()
            .find(|c| page >= c.page && page < c.page + PAGES_PER_CATEGORY)
    }
}
