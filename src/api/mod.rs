//! HTTP surface: the latest stored news as JSON, plus the front-end assets.
//!
//! | Method    | Path        | Handler         |
//! |-----------|-------------|-----------------|
//! | `GET`     | `/news/{n}` | [`recent_news`] |
//! | `OPTIONS` | `/news/{n}` | [`preflight`]   |
//! | any       | otherwise   | static files    |

pub mod error;

pub use error::{ApiError, ApiResult};

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::store::Store;

#[derive(Clone)]
pub struct ApiState {
    store: Arc<dyn Store + Send + Sync>,
}

/// Build the router. When `static_dir` is given, every unmatched path is
/// served from it.
pub fn router(store: Arc<dyn Store + Send + Sync>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/news/{n}", get(recent_news).options(preflight))
        .with_state(ApiState { store });

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http())
}

/// `GET /news/{n}`: the `n` most recent items, newest first.
///
/// A non-numeric `n` is a 400. Zero or negative `n` means "no items" and is
/// answered without touching the store.
pub async fn recent_news(
    State(state): State<ApiState>,
    UrlPath(raw): UrlPath<String>,
) -> ApiResult<Response> {
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidParameter(raw.clone()))?;

    let items = if n <= 0 {
        Vec::new()
    } else {
        state.store.recent_items(n)?
    };

    Ok(([(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(items)).into_response())
}

/// `OPTIONS /news/{n}`: empty 200 with the cross-origin headers.
pub async fn preflight() -> impl IntoResponse {
    [
        (header::CONTENT_TYPE, "application/json"),
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
    ]
}
