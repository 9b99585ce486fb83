use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::clock::Clock;
use crate::domain::{iso_week_key, local_date, WeekLog, WisdomItem, WisdomSource};
use crate::store::{get_json, set_json, KvStore};

pub const WEEK_LOG_KEY: &str = "wisdom/weeklog/v1";

/// Record of items shown during the current ISO week.
///
/// Only one week is ever stored; a log for any other week is replaced by an
/// empty one the first time something is recorded.
#[derive(Clone)]
pub struct WeekLogStore {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl WeekLogStore {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn stored(&self) -> Option<WeekLog> {
        match get_json(self.store.as_ref(), WEEK_LOG_KEY) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!("Unreadable week log, starting fresh: {}", e);
                None
            }
        }
    }

    /// The stored log if it belongs to `week_key`, else a fresh empty log.
    /// Nothing is persisted here.
    pub fn log_for_key(&self, week_key: &str) -> WeekLog {
        match self.stored() {
            Some(log) if log.iso_week_key == week_key => log,
            Some(log) => {
                tracing::info!(
                    "New week {} (previous log {} had {} items)",
                    week_key,
                    log.iso_week_key,
                    log.items.len()
                );
                WeekLog::new(week_key)
            }
            None => WeekLog::new(week_key),
        }
    }

    pub fn log_for(&self, instant: DateTime<Utc>, tz: Tz) -> WeekLog {
        self.log_for_key(&iso_week_key(local_date(instant, tz)))
    }

    pub fn current_log(&self, tz: Tz) -> WeekLog {
        self.log_for(self.clock.now(), tz)
    }

    /// Append `item` to the log for `week_key` unless already present.
    /// Returns whether the item was appended.
    pub fn record_in(&self, week_key: &str, item: &WisdomItem) -> bool {
        let mut log = self.log_for_key(week_key);
        if !log.push_unique(item) {
            return false;
        }
        self.persist(&log);
        true
    }

    /// Like [`record_in`](Self::record_in), also pinning `item` as the pick
    /// for `date` so later reads that day return it again.
    pub fn record_daily_in(&self, week_key: &str, date: NaiveDate, item: &WisdomItem) -> bool {
        let mut log = self.log_for_key(week_key);
        if !log.record_daily(date, item) {
            return false;
        }
        self.persist(&log);
        true
    }

    fn persist(&self, log: &WeekLog) {
        if let Err(e) = set_json(self.store.as_ref(), WEEK_LOG_KEY, log) {
            tracing::warn!("Failed to persist week log: {}", e);
        }
    }

    pub fn record(&self, item: &WisdomItem, tz: Tz) -> bool {
        let key = iso_week_key(local_date(self.clock.now(), tz));
        self.record_in(&key, item)
    }

    /// Koans in the current week's log, in the order they were shown.
    pub fn koans_shown_this_week(&self, tz: Tz) -> Vec<WisdomItem> {
        let key = iso_week_key(local_date(self.clock.now(), tz));
        match self.stored() {
            Some(log) if log.iso_week_key == key => log.items_from(WisdomSource::Koan),
            _ => Vec::new(),
        }
    }
}
