use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::fetcher::http_fetcher::DEFAULT_USER_AGENT;
use crate::fetcher::parallel::DEFAULT_WORKERS;

/// Limits and knobs for the remote content providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Random verses requested per Bible fetch cycle (default: 5)
    pub bible_verses_per_fetch: usize,

    /// Verses longer than this are dropped (default: 500)
    pub bible_max_text_len: usize,

    /// Quotes kept from one stoic API response (default: 20)
    pub stoic_max_items: usize,

    /// Poems must be shorter than this (default: 300)
    pub poetry_max_text_len: usize,

    /// Poems kept from one PoetryDB response (default: 10)
    pub poetry_max_items: usize,

    /// Authors to pick from, one per poetry fetch cycle
    pub poetry_authors: Vec<String>,

    /// Maximum concurrent requests (default: 5)
    pub max_concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            bible_verses_per_fetch: 5,
            bible_max_text_len: 500,
            stoic_max_items: 20,
            poetry_max_text_len: 300,
            poetry_max_items: 10,
            poetry_authors: vec![
                "Emily Dickinson".to_string(),
                "Robert Frost".to_string(),
                "Walt Whitman".to_string(),
                "Edgar Allan Poe".to_string(),
            ],
            max_concurrency: DEFAULT_WORKERS,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Base URLs of the remote APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub bible_api: String,
    pub bible_translation: String,
    pub stoic_api: String,
    pub poetry_api: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            bible_api: "https://bible-api.com".to_string(),
            bible_translation: "kjv".to_string(),
            stoic_api: "https://stoic-quotes.com/api/quotes".to_string(),
            poetry_api: "https://poetrydb.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a fetched catalog stays valid (default: 24)
    pub ttl_hours: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::hours(i64::from(self.ttl_hours))
    }
}
