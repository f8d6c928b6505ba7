use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use rusqlite_migration::{Migrations, M};

use crate::app::{NewswireError, Result};
use crate::domain::NewsItem;
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            NewswireError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

impl Store for SqliteStore {
    fn store_batch(&self, items: &[NewsItem]) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let stored_at = Utc::now().to_rfc3339();
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO news (fingerprint, title, content, link, published_at, stored_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            // Feeds list newest first; inserting in reverse gives the newest
            // undated item the highest id.
            for item in items.iter().rev() {
                inserted += stmt.execute(params![
                    item.fingerprint(),
                    item.title,
                    item.content,
                    item.link,
                    item.published_at.map(|dt| dt.to_rfc3339()),
                    stored_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn recent_items(&self, n: i64) -> Result<Vec<NewsItem>> {
        if n <= 0 {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT title, content, link, published_at
             FROM news
             ORDER BY COALESCE(published_at, stored_at) DESC, id DESC
             LIMIT ?1",
        )?;

        let items = stmt
            .query_map(params![n], |row| {
                Ok(NewsItem {
                    title: row.get(0)?,
                    content: row.get(1)?,
                    link: row.get(2)?,
                    published_at: row
                        .get::<_, Option<String>>(3)?
                        .and_then(|s| Self::parse_datetime(&s)),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?;
        Ok(count)
    }
}
