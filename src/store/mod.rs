pub mod sqlite;

use crate::app::Result;
use crate::domain::NewsItem;

pub use sqlite::SqliteStore;

/// Persistence capability shared by the ingestion pipeline and the query API.
///
/// Implementations must be safe to call from many tasks at once.
pub trait Store {
    /// Persist a batch, skipping items already stored. Returns how many rows
    /// were new. An empty batch is a no-op.
    fn store_batch(&self, items: &[NewsItem]) -> Result<usize>;

    /// Up to `n` items, most recent first. Non-positive `n` yields no items.
    fn recent_items(&self, n: i64) -> Result<Vec<NewsItem>>;

    fn count(&self) -> Result<i64>;
}
