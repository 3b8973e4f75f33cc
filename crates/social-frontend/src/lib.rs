//! Static host for the browser shell.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// `window.API_BASE` assignment read by every page. `api_base` is spliced in
/// verbatim.
pub fn config_script(api_base: &str) -> String {
    format!("window.API_BASE = '{}';", api_base)
}

async fn config_js(State(api_base): State<Arc<str>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        config_script(&api_base),
    )
}

pub fn app(api_base: &str, frontend_dir: impl Into<PathBuf>) -> Router {
    Router::new()
        .route("/config.js", get(config_js))
        .fallback_service(ServeDir::new(frontend_dir.into()))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::<str>::from(api_base))
}
