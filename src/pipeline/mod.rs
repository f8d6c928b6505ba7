//! Concurrent ingestion pipeline.
//!
//! ```text
//! FeedPoller ─┐                    ┌─▶ ingestion consumer ─▶ Store
//! FeedPoller ─┼─▶ batch channel ───┘          │
//! FeedPoller ─┘   error channel ◀─────────────┘ (store failures)
//!                      │
//!                      └─▶ error consumer ─▶ log
//! ```
//!
//! Both channels are unbounded: a poller's send never blocks and never
//! drops, so a slow store cannot stall polling. The cost is that a store that
//! stays slower than the pollers lets the queue grow without limit.

pub mod consumer;
pub mod poller;
pub mod supervisor;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::app::NewswireError;
use crate::domain::NewsItem;

pub use consumer::{log_error, run_error_consumer, run_ingestion_consumer};
pub use poller::FeedPoller;
pub use supervisor::{Pipeline, PipelineHandle, PipelineStats};

/// Items produced by one successful poll of one feed, in feed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBatch {
    /// URL of the feed the batch was read from.
    pub source: String,
    pub items: Vec<NewsItem>,
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("failed to read feed {url}: {source}")]
    Feed {
        url: String,
        #[source]
        source: NewswireError,
    },

    #[error("failed to store {count} items from {url}: {source}")]
    Store {
        url: String,
        count: usize,
        #[source]
        source: NewswireError,
    },
}

impl IngestionError {
    /// The feed the failure belongs to.
    pub fn feed(&self) -> &str {
        match self {
            IngestionError::Feed { url, .. } => url,
            IngestionError::Store { url, .. } => url,
        }
    }
}

pub type BatchSender = mpsc::UnboundedSender<ItemBatch>;
pub type BatchReceiver = mpsc::UnboundedReceiver<ItemBatch>;
pub type ErrorSender = mpsc::UnboundedSender<IngestionError>;
pub type ErrorReceiver = mpsc::UnboundedReceiver<IngestionError>;

/// Producer handles, cloned into every poller.
#[derive(Clone)]
pub struct Sinks {
    pub batches: BatchSender,
    pub errors: ErrorSender,
}

/// Consumer handles. Each receiver goes to exactly one task.
pub struct Drains {
    pub batches: BatchReceiver,
    pub errors: ErrorReceiver,
}

/// Create the two fan-in channels.
pub fn channels() -> (Sinks, Drains) {
    let (batch_tx, batch_rx) = mpsc::unbounded_channel();
    let (error_tx, error_rx) = mpsc::unbounded_channel();

    (
        Sinks {
            batches: batch_tx,
            errors: error_tx,
        },
        Drains {
            batches: batch_rx,
            errors: error_rx,
        },
    )
}
