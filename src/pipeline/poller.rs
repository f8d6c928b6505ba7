use std::sync::Arc;

use crate::config::interval::format_interval;
use crate::domain::FeedSource;
use crate::fetcher::FeedReader;
use crate::pipeline::{IngestionError, ItemBatch, Sinks};
use crate::shutdown::ShutdownSignal;

/// Polls a single feed until shutdown.
///
/// Every cycle reads the feed once, sends either the batch or the error, and
/// then sleeps for the full interval. Failures never shorten the cadence and
/// never stop the poller.
pub struct FeedPoller {
    source: FeedSource,
    reader: Arc<dyn FeedReader + Send + Sync>,
    sinks: Sinks,
    shutdown: ShutdownSignal,
}

impl FeedPoller {
    pub fn new(
        source: FeedSource,
        reader: Arc<dyn FeedReader + Send + Sync>,
        sinks: Sinks,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            source,
            reader,
            sinks,
            shutdown,
        }
    }

    /// Run until shutdown. Returns the number of completed cycles.
    pub async fn run(mut self) -> u64 {
        tracing::info!(
            feed = %self.source.url,
            "Polling every {}",
            format_interval(self.source.interval)
        );

        let mut cycles = 0;
        loop {
            if self.shutdown.is_triggered() {
                break;
            }

            self.poll_once().await;
            cycles += 1;

            if !self.shutdown.sleep(self.source.interval).await {
                break;
            }
        }

        tracing::debug!(feed = %self.source.url, cycles, "Poller stopped");
        cycles
    }

    async fn poll_once(&self) {
        let url = &self.source.url;

        match self.reader.read(url).await {
            Ok(items) => {
                tracing::debug!(feed = %url, items = items.len(), "Fetched feed");
                let batch = ItemBatch {
                    source: url.clone(),
                    items,
                };
                if self.sinks.batches.send(batch).is_err() {
                    tracing::warn!(feed = %url, "Batch channel closed, dropping batch");
                }
            }
            Err(source) => {
                let err = IngestionError::Feed {
                    url: url.clone(),
                    source,
                };
                if let Err(unsent) = self.sinks.errors.send(err) {
                    tracing::warn!("Error channel closed: {}", unsent.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use crate::app::{NewswireError, Result};
    use crate::domain::NewsItem;
    use crate::pipeline::channels;
    use crate::shutdown;

    /// Fails every call and records when it was called.
    struct FailingReader {
        calls: std::sync::Mutex<Vec<Instant>>,
    }

    #[async_trait]
    impl FeedReader for FailingReader {
        async fn read(&self, _url: &str) -> Result<Vec<NewsItem>> {
            self.calls.lock().unwrap().push(Instant::now());
            Err(NewswireError::FeedParse("broken".into()))
        }
    }

    /// Returns one uniquely titled item per call.
    struct CountingReader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeedReader for CountingReader {
        async fn read(&self, _url: &str) -> Result<Vec<NewsItem>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![NewsItem::new(format!("item {}", n), "")])
        }
    }

    struct EmptyReader;

    #[async_trait]
    impl FeedReader for EmptyReader {
        async fn read(&self, _url: &str) -> Result<Vec<NewsItem>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_wait_full_interval() {
        let reader = Arc::new(FailingReader {
            calls: std::sync::Mutex::new(Vec::new()),
        });
        let (sinks, mut drains) = channels();
        let (shutdown, signal) = shutdown::channel();
        let interval = Duration::from_secs(300);

        let poller = FeedPoller::new(
            FeedSource::new("https://b.example.com/rss", interval),
            reader.clone(),
            sinks,
            signal,
        );
        let task = tokio::spawn(poller.run());

        for _ in 0..3 {
            let err = drains.errors.recv().await.unwrap();
            assert_eq!(err.feed(), "https://b.example.com/rss");
        }
        shutdown.trigger();
        let cycles = task.await.unwrap();

        assert_eq!(cycles, 3);
        let calls = reader.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            assert!(pair[1] - pair[0] >= interval);
        }
        assert!(drains.batches.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_batches_sent_in_cycle_order() {
        let reader = Arc::new(CountingReader {
            calls: AtomicUsize::new(0),
        });
        let (sinks, mut drains) = channels();
        let (shutdown, signal) = shutdown::channel();

        let poller = FeedPoller::new(
            FeedSource::new("https://a.example.com/rss", Duration::from_secs(60)),
            reader,
            sinks,
            signal,
        );
        let task = tokio::spawn(poller.run());

        for expected in 0..4 {
            let batch = drains.batches.recv().await.unwrap();
            assert_eq!(batch.source, "https://a.example.com/rss");
            assert_eq!(batch.items[0].title, format!("item {}", expected));
        }
        shutdown.trigger();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_still_sends_batch() {
        let (sinks, mut drains) = channels();
        let (shutdown, signal) = shutdown::channel();

        let poller = FeedPoller::new(
            FeedSource::new("https://empty.example.com/rss", Duration::from_secs(60)),
            Arc::new(EmptyReader),
            sinks,
            signal,
        );
        let task = tokio::spawn(poller.run());

        let batch = drains.batches.recv().await.unwrap();
        assert!(batch.items.is_empty());

        shutdown.trigger();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_start_skips_fetch() {
        let reader = Arc::new(CountingReader {
            calls: AtomicUsize::new(0),
        });
        let (sinks, _drains) = channels();
        let (shutdown, signal) = shutdown::channel();
        shutdown.trigger();

        let cycles = FeedPoller::new(
            FeedSource::new("https://a.example.com/rss", Duration::from_secs(60)),
            reader.clone(),
            sinks,
            signal,
        )
        .run()
        .await;

        assert_eq!(cycles, 0);
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_survives_closed_channels() {
        let reader = Arc::new(CountingReader {
            calls: AtomicUsize::new(0),
        });
        let (sinks, drains) = channels();
        drop(drains);
        let (shutdown, signal) = shutdown::channel();

        let task = tokio::spawn(
            FeedPoller::new(
                FeedSource::new("https://a.example.com/rss", Duration::from_secs(10)),
                reader.clone(),
                sinks,
                signal,
            )
            .run(),
        );

        tokio::time::sleep(Duration::from_secs(35)).await;
        shutdown.trigger();

        assert_eq!(task.await.unwrap(), 4);
    }
}
