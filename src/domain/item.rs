use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Category of wisdom content.
///
/// The declaration order is the fixed rotation order used when picking a
/// source for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WisdomSource {
    Bible,
    Koan,
    Stoic,
    Poetry,
}

impl WisdomSource {
    pub const ALL: [WisdomSource; 4] = [
        WisdomSource::Bible,
        WisdomSource::Koan,
        WisdomSource::Stoic,
        WisdomSource::Poetry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WisdomSource::Bible => "bible",
            WisdomSource::Koan => "koan",
            WisdomSource::Stoic => "stoic",
            WisdomSource::Poetry => "poetry",
        }
    }

    /// Whether the source is backed by a remote API (and therefore cached).
    pub fn is_remote(&self) -> bool {
        !matches!(self, WisdomSource::Koan)
    }

    pub fn remote() -> impl Iterator<Item = WisdomSource> {
        Self::ALL.into_iter().filter(|s| s.is_remote())
    }
}

impl fmt::Display for WisdomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WisdomSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bible" => Ok(WisdomSource::Bible),
            "koan" | "koans" => Ok(WisdomSource::Koan),
            "stoic" => Ok(WisdomSource::Stoic),
            "poetry" => Ok(WisdomSource::Poetry),
            other => Err(format!(
                "Unknown source '{}'. Expected one of: bible, koan, stoic, poetry",
                other
            )),
        }
    }
}

/// One quote, verse or koan in the daily rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisdomItem {
    pub id: String,
    pub source: WisdomSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl WisdomItem {
    pub fn new(id: impl Into<String>, source: WisdomSource, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source,
            title: None,
            text: text.into(),
            reference: None,
            attribution: None,
        }
    }

    /// Generate a deterministic ID from the item's content.
    ///
    /// Used for API-backed items so that the same quote fetched twice, in any
    /// order, keeps the same ID.
    pub fn content_id(source: WisdomSource, attribution: Option<&str>, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(attribution.unwrap_or_default().trim().as_bytes());
        hasher.update(b"\n");
        hasher.update(text.trim().as_bytes());
        let digest = hex::encode(hasher.finalize());
        format!("{}:api-{}", source, &digest[..16])
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.reference.as_deref())
            .unwrap_or(self.source.as_str())
    }

    /// Reference and attribution joined for a footer line, if either exists.
    pub fn citation(&self) -> Option<String> {
        match (self.reference.as_deref(), self.attribution.as_deref()) {
            (Some(r), Some(a)) => Some(format!("{} • {}", r, a)),
            (Some(r), None) => Some(r.to_string()),
            (None, Some(a)) => Some(a.to_string()),
            (None, None) => None,
        }
    }
}

/// A bookmarked item. Lives independently of the daily rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWisdomItem {
    #[serde(flatten)]
    pub item: WisdomItem,
    pub saved_at: DateTime<Utc>,
}

impl SavedWisdomItem {
    pub fn new(item: WisdomItem, saved_at: DateTime<Utc>) -> Self {
        Self { item, saved_at }
    }
}
