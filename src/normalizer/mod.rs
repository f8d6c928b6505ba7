use chrono::Utc;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{NewswireError, Result};
use crate::domain::NewsItem;

/// Converts raw RSS/Atom/JSON Feed bytes into [`NewsItem`]s, preserving the
/// order in which the feed lists its entries.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<Vec<NewsItem>> {
        let feed = parser::parse(body).map_err(|e| NewswireError::FeedParse(e.to_string()))?;

        let items = feed
            .entries
            .into_iter()
            .map(|entry| {
                let title = entry
                    .title
                    .map(|t| decode_html_entities(&t.content).to_string())
                    .unwrap_or_default();

                // Full content when the feed carries it, otherwise the summary.
                let content = entry
                    .content
                    .and_then(|c| c.body)
                    .or(entry.summary.map(|s| s.content))
                    .map(|b| decode_html_entities(&b).to_string())
                    .unwrap_or_default();

                NewsItem {
                    title,
                    content,
                    link: entry.links.first().map(|l| l.href.clone()),
                    published_at: entry
                        .published
                        .or(entry.updated)
                        .map(|dt| dt.with_timezone(&Utc)),
                }
            })
            .collect();

        Ok(items)
    }
}
