use html_escape::decode_html_entities;
use serde::Deserialize;

use crate::app::{AlmanacError, Result};
use crate::config::FetchConfig;
use crate::domain::{WisdomItem, WisdomSource};

/// bible-api.com single-reference response.
#[derive(Debug, Deserialize)]
struct VerseRecord {
    reference: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    translation_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteRecord {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    quote: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// PoetryDB `/author/{name}/lines` entry.
#[derive(Debug, Deserialize)]
struct PoemRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    lines: Option<Vec<String>>,
}

/// Validates remote payloads and turns them into [`WisdomItem`]s.
#[derive(Debug, Clone)]
pub struct Normalizer {
    bible_max_text_len: usize,
    stoic_max_items: usize,
    poetry_max_text_len: usize,
    poetry_max_items: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            bible_max_text_len: config.bible_max_text_len,
            stoic_max_items: config.stoic_max_items,
            poetry_max_text_len: config.poetry_max_text_len,
            poetry_max_items: config.poetry_max_items,
        }
    }

    /// Returns `Ok(None)` for a well-formed verse that is empty or too long.
    pub fn bible_verse(&self, body: &[u8]) -> Result<Option<WisdomItem>> {
        let record: VerseRecord = serde_json::from_slice(body)?;

        let text = record.text.as_deref().map(clean).unwrap_or_default();
        if text.is_empty() || text.chars().count() > self.bible_max_text_len {
            return Ok(None);
        }

        let reference = clean(&record.reference);
        if reference.is_empty() {
            return Ok(None);
        }

        let slug = reference
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();

        let mut item = WisdomItem::new(format!("bible:api-{}", slug), WisdomSource::Bible, text);
        item.title = Some(reference.clone());
        item.reference = Some(reference);
        item.attribution = Some(
            record
                .translation_name
                .map(|t| clean(&t))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "KJV".to_string()),
        );

        Ok(Some(item))
    }

    pub fn stoic_quotes(&self, body: &[u8]) -> Result<Vec<WisdomItem>> {
        let records: Vec<QuoteRecord> = serde_json::from_slice(body)?;
        if records.is_empty() {
            return Err(AlmanacError::Payload("empty stoic quote list".into()));
        }

        let items: Vec<WisdomItem> = records
            .into_iter()
            .take(self.stoic_max_items)
            .filter_map(|record| {
                let text = record.text.or(record.quote).map(|t| clean(&t))?;
                if text.is_empty() {
                    return None;
                }
                let author = record.author.map(|a| clean(&a)).filter(|a| !a.is_empty());

                let id = WisdomItem::content_id(WisdomSource::Stoic, author.as_deref(), &text);
                let mut item = WisdomItem::new(id, WisdomSource::Stoic, text);
                item.attribution = author;
                item.reference = record.source.map(|s| clean(&s)).filter(|s| !s.is_empty());
                Some(item)
            })
            .collect();

        if items.is_empty() {
            return Err(AlmanacError::Payload("no usable stoic quotes".into()));
        }
        Ok(items)
    }

    pub fn poems(&self, body: &[u8]) -> Result<Vec<WisdomItem>> {
        let records: Vec<PoemRecord> = serde_json::from_slice(body)?;

        let items: Vec<WisdomItem> = records
            .into_iter()
            .filter_map(|record| {
                let text = decode_html_entities(&record.lines?.join("\n")).trim().to_string();
                let len = text.chars().count();
                if len == 0 || len >= self.poetry_max_text_len {
                    return None;
                }
                let author = record.author.map(|a| clean(&a)).filter(|a| !a.is_empty());

                let id = WisdomItem::content_id(WisdomSource::Poetry, author.as_deref(), &text);
                let mut item = WisdomItem::new(id, WisdomSource::Poetry, text);
                item.title = record.title.map(|t| clean(&t)).filter(|t| !t.is_empty());
                item.attribution = author;
                Some(item)
            })
            .take(self.poetry_max_items)
            .collect();

        if items.is_empty() {
            return Err(AlmanacError::Payload("no poems short enough".into()));
        }
        Ok(items)
    }
}

fn clean(s: &str) -> String {
    decode_html_entities(s).trim().to_string()
}
