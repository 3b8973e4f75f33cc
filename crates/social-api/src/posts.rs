use axum::{
    Extension, Json,
    extract::{Path, State},
};

use social_types::api::{Ack, ContentRequest};
use social_types::identity::Identity;
use social_types::models::FeedPost;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// Content must be present and not just whitespace. It is otherwise stored
/// byte-for-byte: no length cap, no markup stripping.
fn required_content(req: ContentRequest) -> Result<String, ApiError> {
    req.content
        .filter(|c| !c.trim().is_empty())
        .ok_or(ApiError::BadRequest("Content required"))
}

pub async fn get_feed(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<FeedPost>>, ApiError> {
    let user_id = identity.id();
    let rows = state
        .run_db(move |db| db.get_feed(user_id))
        .await
        .map_err(|e| ApiError::internal("Feed error", e))?;

    Ok(Json(rows))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(req): JsonBody<ContentRequest>,
) -> Result<Json<Ack>, ApiError> {
    let content = required_content(req)?;
    let user_id = identity.id();

    state
        .run_db(move |db| db.create_post(user_id, &content))
        .await
        .map_err(|e| ApiError::internal("Create post error", e))?;

    Ok(Json(Ack::new("Post published")))
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ContentRequest>,
) -> Result<Json<Ack>, ApiError> {
    let content = required_content(req)?;
    let user_id = identity.id();

    let updated = state
        .run_db(move |db| db.update_post(&id, user_id, &content))
        .await
        .map_err(|e| ApiError::internal("Update post error", e))?;

    if updated == 0 {
        return Err(ApiError::NotFound("Post not found"));
    }

    Ok(Json(Ack::new("Post updated")))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    let user_id = identity.id();

    let deleted = state
        .run_db(move |db| db.delete_post(&id, user_id))
        .await
        .map_err(|e| ApiError::internal_quiet("Delete post error", e))?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Post not found"));
    }

    Ok(Json(Ack::new("Post deleted")))
}
