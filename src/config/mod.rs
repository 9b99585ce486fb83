//! Configuration management for Almanac.
//!
//! Configuration is read from `~/.config/almanac/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod fetch;

pub use fetch::{CacheConfig, EndpointConfig, FetchConfig};

use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_TIMEZONE: &str = "America/Indiana/Indianapolis";

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA zone that decides where one day ends and the next begins
    pub timezone: String,
    pub fetch: FetchConfig,
    pub endpoints: EndpointConfig,
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            fetch: FetchConfig::default(),
            endpoints: EndpointConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.tz()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/almanac/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("almanac").join("config.toml"))
    }

    /// The configured timezone, parsed.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# Almanac Configuration
#
# The timezone decides where one day ends and the next begins, and which
# ISO week a day belongs to. Any IANA zone name works.
timezone = "America/Indiana/Indianapolis"

[fetch]
# Request timeout in seconds
timeout_secs = 10

# Random verses requested on each Bible fetch; failed or oversized ones
# are dropped
bible_verses_per_fetch = 5
bible_max_text_len = 500

# Quotes kept from one stoic API response
stoic_max_items = 20

# Poems must be shorter than poetry_max_text_len characters
poetry_max_text_len = 300
poetry_max_items = 10
poetry_authors = ["Emily Dickinson", "Robert Frost", "Walt Whitman", "Edgar Allan Poe"]

# Maximum concurrent requests
max_concurrency = 5

[endpoints]
bible_api = "https://bible-api.com"
bible_translation = "kjv"
stoic_api = "https://stoic-quotes.com/api/quotes"
poetry_api = "https://poetrydb.org"

[cache]
# Fetched catalogs are reused for this many hours
ttl_hours = 24
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),
}
