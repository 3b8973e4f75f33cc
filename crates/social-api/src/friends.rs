use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::Value;

use social_db::value::json_to_sql;
use social_types::api::{Ack, AddFriendRequest};
use social_types::identity::Identity;
use social_types::models::FriendEdge;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

pub async fn list_friends(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<FriendEdge>>, ApiError> {
    let user_id = identity.id();
    let rows = state
        .run_db(move |db| db.list_friends(user_id))
        .await
        .map_err(|e| ApiError::internal("Friends error", e))?;

    Ok(Json(rows))
}

/// POST /api/friends/add
///
/// The nickname is stored exactly as sent.
pub async fn add_friend(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(req): JsonBody<AddFriendRequest>,
) -> Result<Json<Ack>, ApiError> {
    let user_id = identity.id();
    let friend_id = json_to_sql(req.friend_id.as_ref().unwrap_or(&Value::Null));

    let lookup = friend_id.clone();
    let role = state
        .run_db(move |db| db.get_user_role(&lookup))
        .await
        .map_err(|e| ApiError::internal("Add friend error", e))?
        .ok_or(ApiError::NotFound("User not found"))?;

    if role == "admin" {
        return Err(ApiError::BadRequest("Admins cannot be added as friends"));
    }

    state
        .run_db(move |db| db.add_friend(user_id, &friend_id, req.nickname.as_deref()))
        .await
        .map_err(|e| ApiError::internal("Add friend error", e))?;

    Ok(Json(Ack::new("Friend added")))
}

/// DELETE /api/friends/{id}
///
/// Only edges owned by the caller match.
pub async fn remove_friend(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    let user_id = identity.id();
    let removed = state
        .run_db(move |db| db.remove_friend(&id, user_id))
        .await
        .map_err(|e| ApiError::internal_quiet("Remove friend error", e))?;

    if removed == 0 {
        return Err(ApiError::NotFound("Friend not found"));
    }

    Ok(Json(Ack::new("Friend removed")))
}
