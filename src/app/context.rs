use std::path::PathBuf;
use std::sync::Arc;

use chrono_tz::Tz;

use crate::app::error::{AlmanacError, Result};
use crate::cache::CatalogCache;
use crate::catalog::Catalogs;
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ConfigError};
use crate::engine::WisdomEngine;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::providers::ContentProviders;
use crate::saved::SavedWisdomStore;
use crate::settings::SettingsStore;
use crate::store::{KvStore, SqliteStore};
use crate::weeklog::WeekLogStore;

pub struct AppContext {
    pub config: Config,
    pub timezone: Tz,
    pub store: Arc<dyn KvStore>,
    pub clock: Arc<dyn Clock>,
    pub settings: SettingsStore,
    pub saved: SavedWisdomStore,
    pub providers: Arc<ContentProviders>,
    pub engine: WisdomEngine,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<dyn KvStore>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(
            config.fetch.timeout(),
            &config.fetch.user_agent,
        )?);
        let catalogs = Arc::new(Catalogs::bundled()?);

        Self::with_parts(config, store, fetcher, Arc::new(SystemClock), catalogs)
    }

    /// Wire every component from explicit collaborators.
    pub fn with_parts(
        config: Config,
        store: Arc<dyn KvStore>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        clock: Arc<dyn Clock>,
        catalogs: Arc<Catalogs>,
    ) -> Result<Self> {
        let timezone = config.tz().map_err(|e| match e {
            ConfigError::InvalidTimezone(name) => AlmanacError::Timezone(name),
            other => AlmanacError::Config(other.to_string()),
        })?;

        let cache = CatalogCache::new(store.clone(), clock.clone(), config.cache.ttl());
        let providers = Arc::new(ContentProviders::new(
            catalogs,
            cache.clone(),
            fetcher,
            config.endpoints.clone(),
            config.fetch.clone(),
        ));
        let settings = SettingsStore::new(store.clone());
        let saved = SavedWisdomStore::new(store.clone(), clock.clone());
        let engine = WisdomEngine::new(
            settings.clone(),
            WeekLogStore::new(store.clone(), clock.clone()),
            providers.clone(),
            cache,
            clock.clone(),
        );

        Ok(Self {
            config,
            timezone,
            store,
            clock,
            settings,
            saved,
            providers,
            engine,
        })
    }

    pub fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| AlmanacError::Config("Could not find data directory".into()))?;
        let almanac_dir = data_dir.join("almanac");
        std::fs::create_dir_all(&almanac_dir)?;
        Ok(almanac_dir.join("almanac.db"))
    }
}
