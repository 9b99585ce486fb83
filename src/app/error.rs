use thiserror::Error;

use crate::domain::WisdomSource;

#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown timezone: {0}")]
    Timezone(String),

    #[error("No wisdom sources enabled")]
    NoSourcesEnabled,

    #[error("No wisdom items available for source: {0}")]
    EmptyCatalog(WisdomSource),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AlmanacError>;
