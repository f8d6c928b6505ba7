use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::NewsItem;
use crate::fetcher::{FeedReader, FetchResult, Fetcher};
use crate::normalizer::Normalizer;

#[derive(Debug, Clone, Default)]
struct Validators {
    etag: Option<String>,
    last_modified: Option<String>,
}

/// [`FeedReader`] over HTTP that remembers the ETag and Last-Modified of each
/// URL, so an unchanged feed costs a 304 and yields an empty batch.
pub struct HttpFeedReader {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    validators: Mutex<HashMap<String, Validators>>,
}

impl HttpFeedReader {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, normalizer: Normalizer) -> Self {
        Self {
            fetcher,
            normalizer,
            validators: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, url: &str) -> Validators {
        self.validators
            .lock()
            .map(|map| map.get(url).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn remember(&self, url: &str, validators: Validators) {
        if let Ok(mut map) = self.validators.lock() {
            map.insert(url.to_string(), validators);
        }
    }
}

#[async_trait]
impl FeedReader for HttpFeedReader {
    async fn read(&self, url: &str) -> Result<Vec<NewsItem>> {
        let cached = self.cached(url);

        let result = self
            .fetcher
            .fetch(url, cached.etag.as_deref(), cached.last_modified.as_deref())
            .await?;

        match result {
            FetchResult::NotModified => {
                tracing::debug!("Feed {} not modified", url);
                Ok(Vec::new())
            }
            FetchResult::Content {
                body,
                etag,
                last_modified,
            } => {
                let items = self.normalizer.normalize(&body)?;
                // Only remember validators once the body actually parsed.
                self.remember(url, Validators {
                    etag,
                    last_modified,
                });
                Ok(items)
            }
        }
    }

    fn forget(&self, url: &str) {
        if let Ok(mut map) = self.validators.lock() {
            map.remove(url);
        }
    }
}
