//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::app::{AlmanacError, Result};
use crate::catalog::Catalogs;
use crate::domain::{WisdomItem, WisdomSource};
use crate::fetcher::{FetchResponse, Fetcher};
use crate::store::KvStore;

/// A store whose every operation fails.
pub struct FailingStore;

impl KvStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(AlmanacError::Other("storage unavailable".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(AlmanacError::Other("storage unavailable".into()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(AlmanacError::Other("storage unavailable".into()))
    }
}

type Responder = dyn Fn(&str) -> Result<FetchResponse> + Send + Sync;

/// Answers requests from a closure and counts them.
pub struct ScriptedFetcher {
    respond: Box<Responder>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(respond: impl Fn(&str) -> Result<FetchResponse> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
        })
    }

    /// Every request fails as if the network were down.
    pub fn offline() -> Arc<Self> {
        Self::new(|url| Err(AlmanacError::Other(format!("offline: {}", url))))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(url)
    }
}

/// `per_source` items for every source, ids like `koan:2`.
pub fn sample_catalogs(per_source: usize) -> Catalogs {
    let items = WisdomSource::ALL.into_iter().flat_map(|source| {
        (0..per_source).map(move |i| {
            WisdomItem::new(
                format!("{}:{}", source, i),
                source,
                format!("{} text {}", source, i),
            )
        })
    });
    Catalogs::from_items(items).expect("sample catalogs are valid")
}
