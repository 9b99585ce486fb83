use std::sync::Arc;

use crate::app::Result;
use crate::domain::{WisdomSettings, WisdomSource};
use crate::store::{get_json, set_json, KvStore};

pub const SETTINGS_KEY: &str = "wisdom/settings/v1";

#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KvStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Persisted settings merged over defaults. Missing or corrupt records
    /// yield the defaults.
    pub fn load(&self) -> WisdomSettings {
        match get_json(self.store.as_ref(), SETTINGS_KEY) {
            Ok(Some(settings)) => settings,
            Ok(None) => WisdomSettings::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings: {}", e);
                WisdomSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &WisdomSettings) -> Result<()> {
        set_json(self.store.as_ref(), SETTINGS_KEY, settings)
    }

    /// Toggle one source and persist immediately.
    pub fn set_enabled(&self, source: WisdomSource, enabled: bool) -> Result<WisdomSettings> {
        let mut settings = self.load();
        settings.set_enabled(source, enabled);
        self.save(&settings)?;
        Ok(settings)
    }
}
