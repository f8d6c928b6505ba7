//! End-to-end tests: feeds through the pipeline into the store, then out
//! through the HTTP API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use newswire::api;
use newswire::app::{NewswireError, Result};
use newswire::domain::{FeedSource, NewsItem};
use newswire::fetcher::FeedReader;
use newswire::pipeline::Pipeline;
use newswire::shutdown;
use newswire::store::{SqliteStore, Store};

const FEED_A: &str = "https://a.example.com/rss";
const FEED_B: &str = "https://b.example.com/rss";

/// Feed A always yields `A1`; every other feed fails to parse.
struct ScriptedReader;

#[async_trait]
impl FeedReader for ScriptedReader {
    async fn read(&self, url: &str) -> Result<Vec<NewsItem>> {
        if url == FEED_A {
            Ok(vec![NewsItem::new("A1", "first item of feed A")])
        } else {
            Err(NewswireError::FeedParse(format!("unexpected EOF in {}", url)))
        }
    }
}

async fn get(store: Arc<SqliteStore>, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = api::router(store, None).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Runs one poll cycle of feeds A and B and returns the store plus the
/// error log lines.
async fn one_cycle() -> (Arc<SqliteStore>, Vec<String>) {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let log = Arc::new(Mutex::new(Vec::new()));
    let sources = vec![
        FeedSource::new(FEED_A, Duration::from_secs(600)),
        FeedSource::new(FEED_B, Duration::from_secs(600)),
    ];

    let (shutdown, signal) = shutdown::channel();
    let sink = log.clone();
    let handle = Pipeline::new(sources, Arc::new(ScriptedReader), store.clone())
        .spawn_with_reporter(signal, move |e| sink.lock().unwrap().push(e.to_string()));

    tokio::time::sleep(Duration::from_secs(300)).await;
    shutdown.trigger();
    let stats = handle.join().await;
    assert_eq!(stats.cycles, 2);

    let lines = log.lock().unwrap().clone();
    (store, lines)
}

#[tokio::test(start_paused = true)]
async fn test_good_and_bad_feed_end_to_end() {
    let (store, errors) = one_cycle().await;

    let stored = store.recent_items(10).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "A1");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(FEED_B));

    let (status, body) = get(store, "/news/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!([{"title": "A1", "content": "first item of feed A"}])
    );
}

#[tokio::test(start_paused = true)]
async fn test_invalid_and_negative_counts() {
    let (store, _) = one_cycle().await;

    let (status, _) = get(store.clone(), "/news/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(store, "/news/-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_empty_store_returns_empty_array() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());

    for uri in ["/news/1", "/news/50"] {
        let (status, body) = get(store.clone(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}

#[tokio::test(start_paused = true)]
async fn test_repeated_cycles_do_not_duplicate() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let (shutdown, signal) = shutdown::channel();

    let handle = Pipeline::new(
        vec![FeedSource::new(FEED_A, Duration::from_secs(60))],
        Arc::new(ScriptedReader),
        store.clone(),
    )
    .spawn(signal);

    tokio::time::sleep(Duration::from_secs(60 * 5 + 30)).await;
    shutdown.trigger();
    let stats = handle.join().await;

    assert_eq!(stats.cycles, 6);
    assert_eq!(stats.batches, 6);
    assert_eq!(store.count().unwrap(), 1);
}
