//! Daily wisdom selection.
//!
//! The daily pick is a pure function of the local calendar date and the
//! current week's log: the date as `YYYYMMDD` picks the source and then the
//! item, skipping items already shown this ISO week until the source runs
//! dry. Refresh is the opposite: uniformly random and invisible to the
//! week log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::app::{AlmanacError, Result};
use crate::cache::CatalogCache;
use crate::clock::Clock;
use crate::domain::{
    day_seed, is_sunday, iso_week_key, local_date, WeekLog, WisdomItem, WisdomSource,
};
use crate::providers::ContentProviders;
use crate::settings::SettingsStore;
use crate::weeklog::WeekLogStore;

/// What the daily view shows: today's item, plus the week's koans on Sundays.
#[derive(Debug, Clone)]
pub struct DailyWisdom {
    pub today: WisdomItem,
    pub weekly_koans: Vec<WisdomItem>,
}

pub struct WisdomEngine {
    settings: SettingsStore,
    week_log: WeekLogStore,
    providers: Arc<ContentProviders>,
    cache: CatalogCache,
    clock: Arc<dyn Clock>,
}

impl WisdomEngine {
    pub fn new(
        settings: SettingsStore,
        week_log: WeekLogStore,
        providers: Arc<ContentProviders>,
        cache: CatalogCache,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            week_log,
            providers,
            cache,
            clock,
        }
    }

    fn enabled_sources(&self) -> Result<Vec<WisdomSource>> {
        let sources = self.settings.load().enabled_sources();
        if sources.is_empty() {
            return Err(AlmanacError::NoSourcesEnabled);
        }
        Ok(sources)
    }

    /// Deterministic pick for the calendar day `instant` falls on in `tz`.
    ///
    /// The first pick of a day is pinned in the week log, so repeated calls
    /// for that day return it again while its source stays enabled.
    pub async fn pick_daily(&self, instant: DateTime<Utc>, tz: Tz) -> Result<WisdomItem> {
        let sources = self.enabled_sources()?;

        let date = local_date(instant, tz);
        let week_key = iso_week_key(date);
        let log = self.week_log.log_for_key(&week_key);
        let shown = log.shown_ids();

        if let Some(pinned) = log.daily_pick(date) {
            if sources.contains(&pinned.source) {
                tracing::debug!("Daily pick for {} already made: {}", date, pinned.id);
                return Ok(pinned.clone());
            }
        }

        let seed = day_seed(date);
        let source = sources[index(seed, sources.len())];

        let all_items = self.providers.fetch_source(source).await;
        if all_items.is_empty() {
            return Err(AlmanacError::EmptyCatalog(source));
        }

        let candidates: Vec<&WisdomItem> = all_items
            .iter()
            .filter(|i| !shown.contains(i.id.as_str()))
            .collect();
        let pool: Vec<&WisdomItem> = if candidates.is_empty() {
            tracing::debug!("{} exhausted for {}, allowing repeats", source, week_key);
            all_items.iter().collect()
        } else {
            candidates
        };

        let item = pool[index(seed, pool.len())].clone();
        tracing::debug!("Daily pick for {}: {} ({})", date, item.id, source);

        self.week_log.record_daily_in(&week_key, date, &item);

        Ok(item)
    }

    pub async fn pick_today(&self, tz: Tz) -> Result<WisdomItem> {
        self.pick_daily(self.clock.now(), tz).await
    }

    /// A uniformly random item from a random enabled source, after dropping
    /// every fetch cache. Neither reads nor writes the week log.
    pub async fn refresh(&self) -> Result<WisdomItem> {
        let mut rng = StdRng::from_entropy();
        self.refresh_with(&mut rng).await
    }

    pub async fn refresh_with<R: Rng + Send>(&self, rng: &mut R) -> Result<WisdomItem> {
        self.cache.clear_all();

        let sources = self.enabled_sources()?;
        let source = *sources.choose(rng).ok_or(AlmanacError::NoSourcesEnabled)?;

        let all_items = self.providers.fetch_source(source).await;
        all_items
            .choose(rng)
            .cloned()
            .ok_or(AlmanacError::EmptyCatalog(source))
    }

    pub fn current_week(&self, tz: Tz) -> WeekLog {
        self.week_log.current_log(tz)
    }

    /// Koans logged during the current week.
    pub fn weekly_koans(&self, tz: Tz) -> Vec<WisdomItem> {
        self.week_log.koans_shown_this_week(tz)
    }

    pub fn is_sunday(&self, tz: Tz) -> bool {
        is_sunday(local_date(self.clock.now(), tz))
    }

    /// Today's pick, with the week's koans attached on Sundays.
    pub async fn daily_view(&self, tz: Tz) -> Result<DailyWisdom> {
        let today = self.pick_today(tz).await?;
        let weekly_koans = if self.is_sunday(tz) {
            self.weekly_koans(tz)
        } else {
            Vec::new()
        };

        Ok(DailyWisdom {
            today,
            weekly_koans,
        })
    }
}

fn index(seed: u64, len: usize) -> usize {
    (seed % len as u64) as usize
}
