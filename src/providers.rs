//! Per-source content providers.
//!
//! ```text
//! cache hit? ──yes──▶ cached catalog
//!     │ no
//!     ▼
//! remote fetch ──ok──▶ bundled ∪ fetched ──▶ cache
//!     │ err
//!     ▼
//! bundled catalog
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use url::Url;

use crate::app::{AlmanacError, Result};
use crate::cache::CatalogCache;
use crate::catalog::Catalogs;
use crate::config::{EndpointConfig, FetchConfig};
use crate::domain::{WisdomItem, WisdomSource};
use crate::fetcher::{Fetcher, ParallelFetcher};
use crate::normalizer::Normalizer;

struct BibleBook {
    name: &'static str,
    prefix: Option<&'static str>,
    chapters: u32,
    avg_verses: u32,
}

const fn book(name: &'static str, chapters: u32, avg_verses: u32) -> BibleBook {
    BibleBook {
        name,
        prefix: None,
        chapters,
        avg_verses,
    }
}

const fn numbered(prefix: &'static str, name: &'static str, chapters: u32, avg_verses: u32) -> BibleBook {
    BibleBook {
        name,
        prefix: Some(prefix),
        chapters,
        avg_verses,
    }
}

// Verse counts are averages; references past a chapter's end come back as
// errors and get dropped.
const BIBLE_BOOKS: &[BibleBook] = &[
    book("Genesis", 50, 30),
    book("Exodus", 40, 30),
    book("Psalms", 150, 15),
    book("Proverbs", 31, 25),
    book("Isaiah", 66, 25),
    book("Jeremiah", 52, 30),
    book("Matthew", 28, 30),
    book("Mark", 16, 35),
    book("Luke", 24, 40),
    book("John", 21, 30),
    book("Acts", 28, 35),
    book("Romans", 16, 25),
    numbered("1", "Corinthians", 16, 30),
    numbered("2", "Corinthians", 13, 15),
    book("Ephesians", 6, 25),
    book("Philippians", 4, 20),
    book("Colossians", 4, 18),
    numbered("1", "Thessalonians", 5, 20),
    numbered("1", "Timothy", 6, 18),
    book("Hebrews", 13, 25),
    book("James", 5, 20),
    numbered("1", "Peter", 5, 20),
    numbered("1", "John", 5, 15),
    book("Revelation", 22, 20),
];

/// A random `Book chapter:verse` reference from the book table.
pub fn random_verse_reference<R: Rng + ?Sized>(rng: &mut R) -> String {
    let book = &BIBLE_BOOKS[rng.gen_range(0..BIBLE_BOOKS.len())];
    let chapter = rng.gen_range(1..=book.chapters);
    let verse = rng.gen_range(1..=book.avg_verses);

    match book.prefix {
        Some(prefix) => format!("{} {} {}:{}", prefix, book.name, chapter, verse),
        None => format!("{} {}:{}", book.name, chapter, verse),
    }
}

/// Where a provider's items came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Source has no remote API.
    Bundled,
    Cached,
    /// Fresh fetch merged over the bundled catalog.
    Fetched,
    /// Remote fetch failed; bundled catalog only.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub items: Vec<WisdomItem>,
    pub origin: CatalogOrigin,
}

pub struct ContentProviders {
    catalogs: Arc<Catalogs>,
    cache: CatalogCache,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parallel: ParallelFetcher,
    normalizer: Normalizer,
    endpoints: EndpointConfig,
    config: FetchConfig,
}

impl ContentProviders {
    pub fn new(
        catalogs: Arc<Catalogs>,
        cache: CatalogCache,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        endpoints: EndpointConfig,
        config: FetchConfig,
    ) -> Self {
        let parallel = ParallelFetcher::with_workers(fetcher.clone(), config.max_concurrency);
        let normalizer = Normalizer::new(&config);

        Self {
            catalogs,
            cache,
            fetcher,
            parallel,
            normalizer,
            endpoints,
            config,
        }
    }

    /// Items for `source`. Never fails; may be empty only if the bundled
    /// catalog is.
    pub async fn fetch_source(&self, source: WisdomSource) -> Vec<WisdomItem> {
        self.load(source).await.items
    }

    pub async fn load(&self, source: WisdomSource) -> ProviderOutcome {
        let bundled = self.catalogs.get(source);

        if !source.is_remote() {
            return ProviderOutcome {
                items: bundled.to_vec(),
                origin: CatalogOrigin::Bundled,
            };
        }

        if let Some(items) = self.cache.get(source) {
            return ProviderOutcome {
                items,
                origin: CatalogOrigin::Cached,
            };
        }

        match self.fetch_remote(source).await {
            Ok(fetched) => {
                let items = merge(bundled, fetched);
                tracing::info!("Fetched {} catalog ({} items)", source, items.len());
                self.cache.put(source, &items);
                ProviderOutcome {
                    items,
                    origin: CatalogOrigin::Fetched,
                }
            }
            Err(e) => {
                tracing::warn!("{} API failed, using offline data: {}", source, e);
                ProviderOutcome {
                    items: bundled.to_vec(),
                    origin: CatalogOrigin::Fallback,
                }
            }
        }
    }

    async fn fetch_remote(&self, source: WisdomSource) -> Result<Vec<WisdomItem>> {
        match source {
            WisdomSource::Bible => self.fetch_bible().await,
            WisdomSource::Stoic => self.fetch_stoic().await,
            WisdomSource::Poetry => self.fetch_poetry().await,
            WisdomSource::Koan => Ok(Vec::new()),
        }
    }

    async fn fetch_bible(&self) -> Result<Vec<WisdomItem>> {
        let references: Vec<String> = {
            let mut rng = rand::thread_rng();
            (0..self.config.bible_verses_per_fetch)
                .map(|_| random_verse_reference(&mut rng))
                .collect()
        };

        let urls = references
            .iter()
            .map(|r| self.bible_url(r))
            .collect::<Result<Vec<_>>>()?;

        let verses: Vec<WisdomItem> = self
            .parallel
            .fetch_all(urls)
            .await
            .into_iter()
            .filter_map(|(url, result)| match result {
                Ok(response) if response.is_success() => {
                    match self.normalizer.bible_verse(&response.body) {
                        Ok(verse) => verse,
                        Err(e) => {
                            tracing::debug!("Dropping verse from {}: {}", url, e);
                            None
                        }
                    }
                }
                Ok(response) => {
                    tracing::debug!("Dropping verse from {}: HTTP {}", url, response.status);
                    None
                }
                Err(e) => {
                    tracing::debug!("Dropping verse from {}: {}", url, e);
                    None
                }
            })
            .collect();

        if verses.is_empty() {
            return Err(AlmanacError::Payload("no valid verses fetched".into()));
        }
        Ok(verses)
    }

    async fn fetch_stoic(&self) -> Result<Vec<WisdomItem>> {
        let response = self.fetcher.fetch(&self.endpoints.stoic_api).await?;
        if !response.is_success() {
            return Err(AlmanacError::Payload(format!(
                "stoic API returned HTTP {}",
                response.status
            )));
        }
        self.normalizer.stoic_quotes(&response.body)
    }

    async fn fetch_poetry(&self) -> Result<Vec<WisdomItem>> {
        let author = {
            let mut rng = rand::thread_rng();
            self.config.poetry_authors.choose(&mut rng).cloned()
        }
        .ok_or_else(|| AlmanacError::Config("no poetry authors configured".into()))?;

        let url = self.poetry_url(&author)?;
        let response = self.fetcher.fetch(&url).await?;
        if !response.is_success() {
            return Err(AlmanacError::Payload(format!(
                "poetry API returned HTTP {} for {}",
                response.status, author
            )));
        }
        self.normalizer.poems(&response.body)
    }

    fn bible_url(&self, reference: &str) -> Result<String> {
        let mut url = Url::parse(&self.endpoints.bible_api)?;
        url.path_segments_mut()
            .map_err(|_| AlmanacError::Config("bible_api cannot be a base URL".into()))?
            .pop_if_empty()
            .push(reference);
        url.query_pairs_mut()
            .append_pair("translation", &self.endpoints.bible_translation);
        Ok(url.into())
    }

    fn poetry_url(&self, author: &str) -> Result<String> {
        let mut url = Url::parse(&self.endpoints.poetry_api)?;
        url.path_segments_mut()
            .map_err(|_| AlmanacError::Config("poetry_api cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(["author", author, "lines"]);
        Ok(url.into())
    }
}

/// Bundled items first, then fetched items with ids not seen yet.
fn merge(bundled: &[WisdomItem], fetched: Vec<WisdomItem>) -> Vec<WisdomItem> {
    let mut seen: HashSet<String> = bundled.iter().map(|i| i.id.clone()).collect();
    let mut merged = bundled.to_vec();
    for item in fetched {
        if seen.insert(item.id.clone()) {
            merged.push(item);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::fetcher::FetchResponse;
    use crate::store::{KvStore, MemoryStore};
    use crate::testing::{sample_catalogs, ScriptedFetcher};
    use chrono::{TimeDelta, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const VERSE: &str = r#"{"reference": "John 3:16", "text": "For God so loved the world.", "translation_name": "King James Version"}"#;
    const QUOTES: &str = r#"[{"text": "Be one.", "author": "Marcus Aurelius"}, {"text": "Begin at once to live.", "author": "Seneca"}]"#;
    const POEMS: &str = r#"[{"title": "Short", "author": "Emily Dickinson", "lines": ["Hope is the thing", "with feathers"]}]"#;

    struct Harness {
        store: Arc<MemoryStore>,
        clock: Arc<FixedClock>,
        fetcher: Arc<ScriptedFetcher>,
        providers: ContentProviders,
    }

    fn harness(fetcher: Arc<ScriptedFetcher>) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let cache = CatalogCache::new(store.clone(), clock.clone(), TimeDelta::hours(24));
        let providers = ContentProviders::new(
            Arc::new(sample_catalogs(3)),
            cache,
            fetcher.clone(),
            EndpointConfig {
                bible_api: "http://bible.test".into(),
                bible_translation: "kjv".into(),
                stoic_api: "http://stoic.test/api/quotes".into(),
                poetry_api: "http://poetry.test".into(),
            },
            FetchConfig::default(),
        );
        Harness {
            store,
            clock,
            fetcher,
            providers,
        }
    }

    fn online() -> Arc<ScriptedFetcher> {
        ScriptedFetcher::new(|url| {
            if url.starts_with("http://bible.test") {
                Ok(FetchResponse::new(200, VERSE))
            } else if url.starts_with("http://stoic.test") {
                Ok(FetchResponse::new(200, QUOTES))
            } else if url.starts_with("http://poetry.test") {
                Ok(FetchResponse::new(200, POEMS))
            } else {
                Ok(FetchResponse::new(404, ""))
            }
        })
    }

    #[test]
    fn test_random_verse_reference_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let reference = random_verse_reference(&mut rng);
            let (book, location) = reference.rsplit_once(' ').unwrap();
            assert!(BIBLE_BOOKS.iter().any(|b| {
                let name = match b.prefix {
                    Some(p) => format!("{} {}", p, b.name),
                    None => b.name.to_string(),
                };
                name == book
            }));
            let (chapter, verse) = location.split_once(':').unwrap();
            assert!(chapter.parse::<u32>().unwrap() >= 1);
            assert!(verse.parse::<u32>().unwrap() >= 1);
        }
    }

    #[test]
    fn test_merge_bundled_first_and_dedups() {
        let bundled = vec![
            WisdomItem::new("stoic:0", WisdomSource::Stoic, "a"),
            WisdomItem::new("stoic:1", WisdomSource::Stoic, "b"),
        ];
        let fetched = vec![
            WisdomItem::new("stoic:api-x", WisdomSource::Stoic, "x"),
            WisdomItem::new("stoic:1", WisdomSource::Stoic, "b again"),
            WisdomItem::new("stoic:api-x", WisdomSource::Stoic, "x"),
        ];

        let merged = merge(&bundled, fetched);
        let ids: Vec<_> = merged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["stoic:0", "stoic:1", "stoic:api-x"]);
        assert_eq!(merged[1].text, "b");
    }

    #[tokio::test]
    async fn test_koan_never_touches_network() {
        let h = harness(online());
        let outcome = h.providers.load(WisdomSource::Koan).await;

        assert_eq!(outcome.origin, CatalogOrigin::Bundled);
        assert_eq!(outcome.items.len(), 3);
        assert_eq!(h.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_stoic_fetch_merges_and_caches() {
        let h = harness(online());
        let outcome = h.providers.load(WisdomSource::Stoic).await;

        assert_eq!(outcome.origin, CatalogOrigin::Fetched);
        assert_eq!(outcome.items.len(), 5);
        assert_eq!(outcome.items[0].id, "stoic:0");
        assert!(outcome.items[3].id.starts_with("stoic:api-"));
        assert!(h
            .store
            .get(&CatalogCache::key(WisdomSource::Stoic))
            .unwrap()
            .is_some());

        // Served from cache the second time
        let again = h.providers.load(WisdomSource::Stoic).await;
        assert_eq!(again.origin, CatalogOrigin::Cached);
        assert_eq!(again.items, outcome.items);
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_expiry_triggers_refetch() {
        let h = harness(online());
        h.providers.load(WisdomSource::Stoic).await;

        h.clock.advance(TimeDelta::hours(25));
        let outcome = h.providers.load(WisdomSource::Stoic).await;
        assert_eq!(outcome.origin, CatalogOrigin::Fetched);
        assert_eq!(h.fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_bible_fetch_runs_parallel_requests() {
        let h = harness(online());
        let outcome = h.providers.load(WisdomSource::Bible).await;

        assert_eq!(outcome.origin, CatalogOrigin::Fetched);
        assert_eq!(h.fetcher.calls(), 5);
        // Every request returned the same verse; duplicates collapse
        assert_eq!(outcome.items.len(), 4);
        assert_eq!(outcome.items[3].id, "bible:api-john-3:16");
    }

    #[tokio::test]
    async fn test_bible_partial_failures_are_dropped() {
        let counter = std::sync::atomic::AtomicUsize::new(0);
        let fetcher = ScriptedFetcher::new(move |_| {
            let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            match n % 3 {
                0 => Ok(FetchResponse::new(200, VERSE)),
                1 => Ok(FetchResponse::new(404, r#"{"error":"not found"}"#)),
                _ => Err(AlmanacError::Other("timeout".into())),
            }
        });
        let h = harness(fetcher);
        let outcome = h.providers.load(WisdomSource::Bible).await;

        assert_eq!(outcome.origin, CatalogOrigin::Fetched);
        assert!(outcome.items.iter().any(|i| i.id == "bible:api-john-3:16"));
    }

    #[tokio::test]
    async fn test_bible_all_verses_fail_falls_back() {
        let fetcher = ScriptedFetcher::new(|_| {
            Ok(FetchResponse::new(
                200,
                r#"{"reference": "Psalms 1:1", "text": ""}"#,
            ))
        });
        let h = harness(fetcher);
        let outcome = h.providers.load(WisdomSource::Bible).await;

        assert_eq!(outcome.origin, CatalogOrigin::Fallback);
        assert_eq!(outcome.items.len(), 3);
        assert!(h
            .store
            .get(&CatalogCache::key(WisdomSource::Bible))
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_poetry_fetch() {
        let h = harness(online());
        let outcome = h.providers.load(WisdomSource::Poetry).await;

        assert_eq!(outcome.origin, CatalogOrigin::Fetched);
        assert_eq!(outcome.items.len(), 4);
        assert_eq!(outcome.items[3].title.as_deref(), Some("Short"));
    }

    #[tokio::test]
    async fn test_offline_falls_back_to_bundled() {
        let h = harness(ScriptedFetcher::offline());
        for source in WisdomSource::remote() {
            let outcome = h.providers.load(source).await;
            assert_eq!(outcome.origin, CatalogOrigin::Fallback);
            assert_eq!(outcome.items.len(), 3);
        }
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let h = harness(ScriptedFetcher::new(|_| Ok(FetchResponse::new(500, "oops"))));
        let items = h.providers.fetch_source(WisdomSource::Stoic).await;
        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_payload_falls_back() {
        let h = harness(ScriptedFetcher::new(|_| Ok(FetchResponse::new(200, "<html>"))));
        let items = h.providers.fetch_source(WisdomSource::Poetry).await;
        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn test_stoic_over_http() {
        use crate::fetcher::http_fetcher::{HttpFetcher, DEFAULT_USER_AGENT};
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quotes"))
            .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let cache = CatalogCache::new(store, clock, TimeDelta::hours(24));
        let fetcher = HttpFetcher::new(std::time::Duration::from_secs(5), DEFAULT_USER_AGENT).unwrap();
        let providers = ContentProviders::new(
            Arc::new(sample_catalogs(1)),
            cache,
            Arc::new(fetcher),
            EndpointConfig {
                stoic_api: format!("{}/api/quotes", server.uri()),
                ..EndpointConfig::default()
            },
            FetchConfig::default(),
        );

        let first = providers.load(WisdomSource::Stoic).await;
        assert_eq!(first.origin, CatalogOrigin::Fetched);
        assert_eq!(first.items.len(), 3);
        assert_eq!(first.items[2].attribution.as_deref(), Some("Seneca"));

        let second = providers.load(WisdomSource::Stoic).await;
        assert_eq!(second.origin, CatalogOrigin::Cached);
    }

    #[test]
    fn test_urls_are_encoded() {
        let h = harness(online());
        let url = h.providers.bible_url("1 John 4:8").unwrap();
        assert_eq!(url, "http://bible.test/1%20John%204:8?translation=kjv");

        let url = h.providers.poetry_url("Emily Dickinson").unwrap();
        assert_eq!(url, "http://poetry.test/author/Emily%20Dickinson/lines");
    }
}
