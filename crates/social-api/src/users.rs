use axum::{
    Json,
    extract::{Path, State},
};

use social_types::api::{Ack, UpdateProfileRequest};
use social_types::models::Profile;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// GET /api/users/{id}
///
/// Any profile, for any signed-in caller.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .run_db(move |db| db.get_profile(&id))
        .await
        .map_err(|e| ApiError::internal("Profile error", e))?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(profile))
}

/// PUT /api/users/{id}
///
/// Rewrites name and bio of whichever id is in the path.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<Json<Ack>, ApiError> {
    state
        .run_db(move |db| db.update_profile(&id, req.name.as_deref(), req.bio.as_deref()))
        .await
        .map_err(|e| ApiError::internal("Update error", e))?;

    Ok(Json(Ack::new("Profile updated")))
}
