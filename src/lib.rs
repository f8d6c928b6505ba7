//! # Newswire
//!
//! Polls a fixed set of RSS/Atom feeds, stores every new item in SQLite and
//! serves the most recent ones as JSON for a separate front-end.
//!
//! ## Architecture
//!
//! ```text
//! FeedPoller × N ─▶ (batch channel, error channel) ─▶ consumers ─▶ Store
//!                                                                   ▲
//!                               HTTP  GET /news/{n} ─▶ api ─────────┘
//! ```
//!
//! The ingestion pipeline and the API share only the store. A failing feed
//! never affects other feeds, and a failing request never affects polling.
//!
//! ## Quick Start
//!
//! ```bash
//! newswire init            # write config.toml
//! newswire                 # poll feeds and serve on 0.0.0.0:80
//! newswire recent -n 5     # print what has been stored
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the config,
/// the store and the feed reader.
pub mod app;

/// HTTP API built with axum.
pub mod api;

/// Command-line interface using clap.
pub mod cli;

/// TOML configuration: feeds, polling period, storage, server, fetch options.
pub mod config;

/// Core domain models.
///
/// - [`NewsItem`](domain::NewsItem): one parsed entry
/// - [`FeedSource`](domain::FeedSource): a feed URL and its polling interval
pub mod domain;

/// HTTP fetching with conditional requests, and the [`FeedReader`](fetcher::FeedReader)
/// capability the pollers depend on.
pub mod fetcher;

/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0 into
/// [`NewsItem`](domain::NewsItem)s.
pub mod normalizer;

/// Feed pollers, fan-in channels, consumers and the supervisor that runs them.
pub mod pipeline;

/// Cancellation signal for graceful shutdown.
pub mod shutdown;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
