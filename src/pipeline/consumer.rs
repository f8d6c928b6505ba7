use std::sync::Arc;

use crate::fetcher::FeedReader;
use crate::pipeline::{BatchReceiver, ErrorReceiver, ErrorSender, IngestionError};
use crate::store::Store;

/// Drain the batch channel into the store, one `store_batch` call per batch.
///
/// Storage failures are forwarded to the error channel instead of stopping
/// the consumer, and the reader is told to forget the feed so its next poll
/// delivers the lost items again. Returns the number of batches handled once
/// every producer has gone away.
pub async fn run_ingestion_consumer(
    mut batches: BatchReceiver,
    store: Arc<dyn Store + Send + Sync>,
    reader: Arc<dyn FeedReader + Send + Sync>,
    errors: ErrorSender,
) -> usize {
    let mut handled = 0;

    while let Some(batch) = batches.recv().await {
        handled += 1;
        let count = batch.items.len();

        match store.store_batch(&batch.items) {
            Ok(0) => {
                tracing::debug!(feed = %batch.source, received = count, "No new items");
            }
            Ok(added) => {
                tracing::info!("Added {} new items from {}", added, batch.source);
            }
            Err(source) => {
                reader.forget(&batch.source);
                let err = IngestionError::Store {
                    url: batch.source,
                    count,
                    source,
                };
                if let Err(unsent) = errors.send(err) {
                    // Error consumer is gone; keep the failure visible anyway.
                    log_error(&unsent.0);
                }
            }
        }
    }

    tracing::debug!(batches = handled, "Ingestion consumer stopped");
    handled
}

/// Drain the error channel, handing every error to `report`.
/// Returns the number of errors observed once the channel closes.
pub async fn run_error_consumer<F>(mut errors: ErrorReceiver, mut report: F) -> usize
where
    F: FnMut(&IngestionError),
{
    let mut observed = 0;

    while let Some(err) = errors.recv().await {
        observed += 1;
        report(&err);
    }

    tracing::debug!(errors = observed, "Error consumer stopped");
    observed
}

pub fn log_error(err: &IngestionError) {
    tracing::error!(feed = %err.feed(), "{}", err);
}
