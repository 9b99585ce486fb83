use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{WisdomItem, WisdomSource};

/// Calendar date of `instant` as seen on a wall clock in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// ISO-8601 week identifier, e.g. `2025-W01`.
///
/// Weeks start on Monday and belong to the year holding their Thursday, so
/// the ISO year can differ from the calendar year around New Year.
pub fn iso_week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// The date as the integer `YYYYMMDD`, built from calendar fields.
pub fn day_seed(date: NaiveDate) -> u64 {
    let year = u64::from(date.year().unsigned_abs());
    year * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}

pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Items already shown during one ISO week, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekLog {
    pub iso_week_key: String,
    pub items: Vec<WisdomItem>,
    /// Daily pick id keyed by `YYYY-MM-DD`.
    #[serde(default)]
    pub daily: BTreeMap<String, String>,
}

impl WeekLog {
    pub fn new(iso_week_key: impl Into<String>) -> Self {
        Self {
            iso_week_key: iso_week_key.into(),
            items: Vec::new(),
            daily: BTreeMap::new(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    pub fn shown_ids(&self) -> HashSet<&str> {
        self.items.iter().map(|i| i.id.as_str()).collect()
    }

    /// Append `item` unless an item with the same id is already logged.
    pub fn push_unique(&mut self, item: &WisdomItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.items.push(item.clone());
        true
    }

    /// The item already picked for `date`, if it is still in the log.
    pub fn daily_pick(&self, date: NaiveDate) -> Option<&WisdomItem> {
        let id = self.daily.get(&date.to_string())?;
        self.items.iter().find(|i| &i.id == id)
    }

    /// Remember `item` as the pick for `date`. Returns whether the log changed.
    pub fn record_daily(&mut self, date: NaiveDate, item: &WisdomItem) -> bool {
        let appended = self.push_unique(item);
        let previous = self.daily.insert(date.to_string(), item.id.clone());
        appended || previous.as_deref() != Some(item.id.as_str())
    }

    pub fn items_from(&self, source: WisdomSource) -> Vec<WisdomItem> {
        self.items
            .iter()
            .filter(|i| i.source == source)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_week_key_mid_year() {
        assert_eq!(iso_week_key(date(2025, 10, 1)), "2025-W40");
    }

    #[test]
    fn test_iso_week_key_year_boundaries() {
        // Friday Jan 1 2021 belongs to the last week of 2020
        assert_eq!(iso_week_key(date(2021, 1, 1)), "2020-W53");
        // Monday Dec 30 2024 starts the first week of 2025
        assert_eq!(iso_week_key(date(2024, 12, 30)), "2025-W01");
        assert_eq!(iso_week_key(date(2025, 1, 1)), "2025-W01");
        assert_eq!(iso_week_key(date(2025, 1, 5)), "2025-W01");
        assert_eq!(iso_week_key(date(2025, 1, 6)), "2025-W02");
    }

    #[test]
    fn test_local_date_respects_timezone() {
        // 03:00 UTC Monday is still Sunday evening in Indianapolis
        let instant = Utc.with_ymd_and_hms(2025, 1, 6, 3, 0, 0).unwrap();
        let tz: Tz = "America/Indiana/Indianapolis".parse().unwrap();

        assert_eq!(local_date(instant, tz), date(2025, 1, 5));
        assert_eq!(local_date(instant, Tz::UTC), date(2025, 1, 6));
        assert_eq!(iso_week_key(local_date(instant, tz)), "2025-W01");
        assert_eq!(iso_week_key(local_date(instant, Tz::UTC)), "2025-W02");
    }

    #[test]
    fn test_day_seed() {
        assert_eq!(day_seed(date(2025, 1, 1)), 20250101);
        assert_eq!(day_seed(date(2024, 12, 31)), 20241231);
    }

    #[test]
    fn test_is_sunday() {
        assert!(is_sunday(date(2025, 1, 5)));
        assert!(!is_sunday(date(2025, 1, 6)));
    }

    #[test]
    fn test_push_unique() {
        let mut log = WeekLog::new("2025-W01");
        let item = WisdomItem::new("koan:mu", WisdomSource::Koan, "Mu.");

        assert!(log.push_unique(&item));
        assert!(!log.push_unique(&item));
        assert_eq!(log.items.len(), 1);
        assert!(log.shown_ids().contains("koan:mu"));
    }

    #[test]
    fn test_record_daily() {
        let mut log = WeekLog::new("2025-W01");
        let mu = WisdomItem::new("koan:mu", WisdomSource::Koan, "Mu.");

        assert!(log.daily_pick(date(2025, 1, 1)).is_none());
        assert!(log.record_daily(date(2025, 1, 1), &mu));
        assert!(!log.record_daily(date(2025, 1, 1), &mu));
        assert_eq!(log.daily_pick(date(2025, 1, 1)), Some(&mu));
        assert!(log.daily_pick(date(2025, 1, 2)).is_none());
        assert_eq!(log.items.len(), 1);
    }

    #[test]
    fn test_log_without_daily_map_deserializes() {
        let log: WeekLog =
            serde_json::from_str(r#"{"iso_week_key":"2025-W01","items":[]}"#).unwrap();
        assert!(log.daily.is_empty());
    }

    #[test]
    fn test_items_from_filters_by_source() {
        let mut log = WeekLog::new("2025-W01");
        log.push_unique(&WisdomItem::new("koan:mu", WisdomSource::Koan, "Mu."));
        log.push_unique(&WisdomItem::new("stoic:a", WisdomSource::Stoic, "a"));
        log.push_unique(&WisdomItem::new("koan:flag", WisdomSource::Koan, "Mind moves."));

        let koans = log.items_from(WisdomSource::Koan);
        let ids: Vec<_> = koans.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["koan:mu", "koan:flag"]);
    }
}
