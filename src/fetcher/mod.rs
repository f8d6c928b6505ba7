pub mod http_fetcher;
pub mod reader;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::NewsItem;

pub use http_fetcher::HttpFetcher;
pub use reader::HttpFeedReader;

#[derive(Debug)]
pub enum FetchResult {
    /// New content fetched successfully
    Content {
        body: Vec<u8>,
        etag: Option<String>,
        last_modified: Option<String>,
    },
    /// Content not modified (HTTP 304)
    NotModified,
}

#[async_trait]
pub trait Fetcher {
    async fn fetch(
        &self,
        url: &str,
        etag: Option<&str>,
        last_modified: Option<&str>,
    ) -> Result<FetchResult>;
}

/// Reads one feed: fetch the URL and parse it into an ordered list of items.
///
/// This is the only capability a feed poller needs, so tests substitute it
/// with scripted readers.
#[async_trait]
pub trait FeedReader {
    async fn read(&self, url: &str) -> Result<Vec<NewsItem>>;

    /// Drop whatever the reader cached for `url`, so the next `read` returns
    /// the full feed again. Called when a batch from `url` could not be stored.
    fn forget(&self, _url: &str) {}
}
