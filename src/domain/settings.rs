use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::WisdomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BibleTranslation {
    Kjv,
    Asv,
    Web,
}

/// User preferences for the daily rotation.
///
/// Sources missing from `enabled_sources` count as enabled, so a partial
/// persisted record merges over the all-enabled default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WisdomSettings {
    pub enabled_sources: BTreeMap<WisdomSource, bool>,
    pub preferred_bible_translation: Option<BibleTranslation>,
}

impl Default for WisdomSettings {
    fn default() -> Self {
        Self {
            enabled_sources: WisdomSource::ALL.iter().map(|s| (*s, true)).collect(),
            preferred_bible_translation: Some(BibleTranslation::Web),
        }
    }
}

impl WisdomSettings {
    pub fn is_enabled(&self, source: WisdomSource) -> bool {
        self.enabled_sources.get(&source).copied().unwrap_or(true)
    }

    pub fn set_enabled(&mut self, source: WisdomSource, enabled: bool) {
        self.enabled_sources.insert(source, enabled);
    }

    /// Enabled sources in rotation order.
    pub fn enabled_sources(&self) -> Vec<WisdomSource> {
        WisdomSource::ALL
            .into_iter()
            .filter(|s| self.is_enabled(*s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let settings = WisdomSettings::default();
        assert_eq!(settings.enabled_sources(), WisdomSource::ALL.to_vec());
        assert_eq!(
            settings.preferred_bible_translation,
            Some(BibleTranslation::Web)
        );
    }

    #[test]
    fn test_enabled_sources_keeps_rotation_order() {
        let mut settings = WisdomSettings::default();
        settings.set_enabled(WisdomSource::Koan, false);
        assert_eq!(
            settings.enabled_sources(),
            vec![WisdomSource::Bible, WisdomSource::Stoic, WisdomSource::Poetry]
        );
    }

    #[test]
    fn test_partial_record_merges_over_defaults() {
        let json = r#"{"enabled_sources":{"stoic":false}}"#;
        let settings: WisdomSettings = serde_json::from_str(json).unwrap();

        assert!(!settings.is_enabled(WisdomSource::Stoic));
        assert!(settings.is_enabled(WisdomSource::Bible));
        assert!(settings.is_enabled(WisdomSource::Koan));
        assert!(settings.is_enabled(WisdomSource::Poetry));
    }

    #[test]
    fn test_empty_record_is_default() {
        let settings: WisdomSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, WisdomSettings::default());
    }

    #[test]
    fn test_translation_serializes_uppercase() {
        let json = serde_json::to_string(&BibleTranslation::Kjv).unwrap();
        assert_eq!(json, "\"KJV\"");
    }
}
