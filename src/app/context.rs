use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::fetcher::{FeedReader, HttpFeedReader, HttpFetcher};
use crate::normalizer::Normalizer;
use crate::store::SqliteStore;

/// Wires together the loaded config, the store and the feed reader.
///
/// Construction is where startup failures surface: a store that cannot be
/// opened or migrated stops the process before any poller exists.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub reader: Arc<dyn FeedReader + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config
            .storage
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)?;
        }

        let store = Arc::new(SqliteStore::new(&config.storage.path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
        let reader: Arc<dyn FeedReader + Send + Sync> =
            Arc::new(HttpFeedReader::new(fetcher, Normalizer::new()));

        Ok(Self {
            config,
            store,
            reader,
        })
    }
}
