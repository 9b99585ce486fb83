//! Time-boxed cache of fetched catalogs, one record per remote source.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::{WisdomItem, WisdomSource};
use crate::store::{get_json, set_json, KvStore};

pub const API_CACHE_PREFIX: &str = "wisdom/api-cache/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    timestamp: DateTime<Utc>,
    items: Vec<WisdomItem>,
}

/// Never fails: storage and decoding problems read as a miss and writes
/// that fail are dropped with a warning.
#[derive(Clone)]
pub struct CatalogCache {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self { store, clock, ttl }
    }

    pub fn key(source: WisdomSource) -> String {
        format!("{}/{}", API_CACHE_PREFIX, source)
    }

    /// Cached items for `source`, if an entry exists and is younger than the TTL.
    /// Stale entries are deleted on the way out.
    pub fn get(&self, source: WisdomSource) -> Option<Vec<WisdomItem>> {
        let key = Self::key(source);

        let entry: CacheEntry = match get_json(self.store.as_ref(), &key) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                tracing::debug!("Cache miss for {}", source);
                return None;
            }
            Err(e) => {
                tracing::warn!("Unreadable cache entry for {}: {}", source, e);
                return None;
            }
        };

        let age = self.clock.now() - entry.timestamp;
        if age < self.ttl {
            tracing::debug!("Cache hit for {} ({} items)", source, entry.items.len());
            return Some(entry.items);
        }

        tracing::debug!("Cache entry for {} expired", source);
        if let Err(e) = self.store.remove(&key) {
            tracing::warn!("Failed to purge stale cache for {}: {}", source, e);
        }
        None
    }

    pub fn put(&self, source: WisdomSource, items: &[WisdomItem]) {
        let entry = CacheEntry {
            timestamp: self.clock.now(),
            items: items.to_vec(),
        };

        if let Err(e) = set_json(self.store.as_ref(), &Self::key(source), &entry) {
            tracing::warn!("Failed to cache {} data: {}", source, e);
        }
    }

    pub fn clear(&self, source: WisdomSource) {
        if let Err(e) = self.store.remove(&Self::key(source)) {
            tracing::warn!("Failed to clear {} cache: {}", source, e);
        }
    }

    /// Drop every remote source's entry.
    pub fn clear_all(&self) {
        for source in WisdomSource::remote() {
            self.clear(source);
        }
    }
}
