//! Bundled static catalogs shipped inside the binary.

use std::collections::{HashMap, HashSet};

use crate::app::{AlmanacError, Result};
use crate::domain::{WisdomItem, WisdomSource};

const BIBLE_JSON: &str = include_str!("../data/bible.json");
const KOANS_JSON: &str = include_str!("../data/koans.json");
const STOIC_JSON: &str = include_str!("../data/stoic.json");
const POETRY_JSON: &str = include_str!("../data/poetry.json");

/// Immutable per-source item lists, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    by_source: HashMap<WisdomSource, Vec<WisdomItem>>,
}

impl Catalogs {
    pub fn bundled() -> Result<Self> {
        let mut catalogs = Self::default();
        for (source, raw) in [
            (WisdomSource::Bible, BIBLE_JSON),
            (WisdomSource::Koan, KOANS_JSON),
            (WisdomSource::Stoic, STOIC_JSON),
            (WisdomSource::Poetry, POETRY_JSON),
        ] {
            let items: Vec<WisdomItem> = serde_json::from_str(raw)?;
            catalogs.insert(source, items)?;
        }
        Ok(catalogs)
    }

    /// Build catalogs from loose items, grouped by their source.
    pub fn from_items(items: impl IntoIterator<Item = WisdomItem>) -> Result<Self> {
        let mut grouped: HashMap<WisdomSource, Vec<WisdomItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.source).or_default().push(item);
        }

        let mut catalogs = Self::default();
        for (source, items) in grouped {
            catalogs.insert(source, items)?;
        }
        Ok(catalogs)
    }

    pub fn get(&self, source: WisdomSource) -> &[WisdomItem] {
        self.by_source
            .get(&source)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_source.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, source: WisdomSource, items: Vec<WisdomItem>) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.source != source {
                return Err(AlmanacError::Config(format!(
                    "catalog for {} contains {} item '{}'",
                    source, item.source, item.id
                )));
            }
            if item.text.trim().is_empty() {
                return Err(AlmanacError::Config(format!(
                    "catalog item '{}' has empty text",
                    item.id
                )));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(AlmanacError::Config(format!(
                    "duplicate catalog id '{}'",
                    item.id
                )));
            }
        }
        self.by_source.insert(source, items);
        Ok(())
    }
}
