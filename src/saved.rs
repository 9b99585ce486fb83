use std::sync::Arc;

use crate::app::Result;
use crate::clock::Clock;
use crate::domain::{SavedWisdomItem, WisdomItem};
use crate::store::{get_json, set_json, KvStore};

pub const SAVED_KEY: &str = "wisdom/saved/v1";

/// User-curated bookmarks, newest first.
#[derive(Clone)]
pub struct SavedWisdomStore {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl SavedWisdomStore {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn list(&self) -> Vec<SavedWisdomItem> {
        match get_json(self.store.as_ref(), SAVED_KEY) {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable saved list: {}", e);
                Vec::new()
            }
        }
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.list().iter().any(|s| s.item.id == id)
    }

    /// Bookmark `item`. Returns `false` if it was already saved.
    pub fn save(&self, item: &WisdomItem) -> Result<bool> {
        let mut saved = self.list();
        if saved.iter().any(|s| s.item.id == item.id) {
            return Ok(false);
        }

        saved.insert(0, SavedWisdomItem::new(item.clone(), self.clock.now()));
        set_json(self.store.as_ref(), SAVED_KEY, &saved)?;
        Ok(true)
    }

    /// Remove the bookmark with `id`. Returns `false` if none existed.
    pub fn unsave(&self, id: &str) -> Result<bool> {
        let mut saved = self.list();
        let before = saved.len();
        saved.retain(|s| s.item.id != id);
        if saved.len() == before {
            return Ok(false);
        }

        set_json(self.store.as_ref(), SAVED_KEY, &saved)?;
        Ok(true)
    }
}
