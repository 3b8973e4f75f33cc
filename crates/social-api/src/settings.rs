use axum::{
    Extension, Json,
    extract::State,
};
use serde_json::Value;

use social_types::api::SettingsResponse;
use social_types::identity::Identity;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// POST /api/settings/update
///
/// Every key in the body other than `role` is written to the caller's row
/// as a column of the same name. There is no allow-list: `blocked`,
/// `password`, `email`, or a differently cased `Role` all go through.
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let Value::Object(mut updates) = body else {
        return Err(ApiError::BadRequest("Settings must be a JSON object"));
    };
    updates.remove("role");

    let user_id = identity.id();
    let applied = updates.clone();
    state
        .run_db(move |db| db.apply_settings(user_id, &updates))
        .await
        .map_err(|e| ApiError::internal("Settings error", e))?;

    Ok(Json(SettingsResponse {
        message: "Settings updated".into(),
        applied,
    }))
}
