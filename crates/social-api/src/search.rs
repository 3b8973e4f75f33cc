use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Map, Value};

use social_types::api::SearchQuery;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/search?q=
///
/// `q` goes straight into the statement text.
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let term = query.q.unwrap_or_default();
    let rows = state
        .run_db(move |db| db.search_users(&term))
        .await
        .map_err(|e| ApiError::internal("Search error", e))?;

    Ok(Json(rows))
}
