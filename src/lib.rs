//! # Almanac
//!
//! A daily wisdom rotation: one Bible verse, Zen koan, Stoic quote or poem
//! per calendar day, never repeating within an ISO week until a source runs
//! out.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Cache → Providers → Engine → CLI
//!                                    ↑          ↓
//!                              bundled data  Week log / Settings / Saved
//! ```
//!
//! Every persisted record lives in one key-value [`store`]. Remote catalogs
//! are cached for a day and fall back to the bundled data whenever a fetch
//! fails, so the daily pick works offline.
//!
//! ## Quick Start
//!
//! ```bash
//! # Today's wisdom
//! almanac today
//!
//! # Something random, refetching remote sources
//! almanac refresh --save
//!
//! # Turn a source off
//! almanac disable poetry
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`engine`]: Daily and random selection
//! - [`providers`]: Per-source catalogs with remote fetch and fallback
//! - [`store`]: Key-value persistence

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// store, clock, fetcher, providers, engine.
pub mod app;

/// TTL cache of fetched catalogs, one entry per remote source.
pub mod cache;

/// Bundled offline catalogs compiled into the binary.
pub mod catalog;

/// Command-line interface using clap.
///
/// - `today [--save]` - Today's item, plus the week's koans on Sundays
/// - `refresh [--save]` - A random item from freshly fetched catalogs
/// - `week [--all]` - Items logged this ISO week
/// - `sources` / `enable <source>` / `disable <source>`
/// - `catalog <source>` - Where a source's items currently come from
/// - `saved` / `unsave <id>` - Bookmarks
pub mod cli;

/// Injectable time source.
pub mod clock;

/// Configuration loaded from `~/.config/almanac/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`WisdomItem`](domain::WisdomItem): One verse, koan, quote or poem
/// - [`WisdomSettings`](domain::WisdomSettings): Which sources are enabled
/// - [`WeekLog`](domain::WeekLog): Items shown in one ISO week
pub mod domain;

/// Deterministic daily pick and random refresh.
pub mod engine;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for GET requests
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent fetching with semaphore
pub mod fetcher;

/// Converts Bible, Stoic and poetry API payloads into [`WisdomItem`](domain::WisdomItem)s.
pub mod normalizer;

pub mod providers;

/// Bookmarked items.
pub mod saved;

/// Persisted [`WisdomSettings`](domain::WisdomSettings).
pub mod settings;

/// Key-value persistence.
///
/// - [`KvStore`](store::KvStore): Trait over string records
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
/// - [`MemoryStore`](store::MemoryStore): In-process map
pub mod store;

/// Persisted [`WeekLog`](domain::WeekLog) for the current week.
pub mod weeklog;

#[cfg(test)]
mod testing;
