use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde_json::Value;

use social_db::value::json_to_sql;
use social_types::api::{Ack, SendMessageRequest, ThreadQuery};
use social_types::identity::Identity;
use social_types::models::ThreadMessage;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// GET /api/messages?userId=
///
/// Both directions, oldest first.
pub async fn get_thread(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ThreadQuery>,
) -> Result<Json<Vec<ThreadMessage>>, ApiError> {
    let user_id = identity.id();
    let rows = state
        .run_db(move |db| db.get_thread(user_id, query.user_id.as_deref()))
        .await
        .map_err(|e| ApiError::internal("Messages error", e))?;

    Ok(Json(rows))
}

/// POST /api/messages/send
///
/// No origin or CSRF check of any kind.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(req): JsonBody<SendMessageRequest>,
) -> Result<Json<Ack>, ApiError> {
    let sender_id = identity.id();
    let recipient_id = json_to_sql(req.recipient_id.as_ref().unwrap_or(&Value::Null));

    state
        .run_db(move |db| db.send_message(sender_id, &recipient_id, req.body.as_deref()))
        .await
        .map_err(|e| ApiError::internal("Send message error", e))?;

    Ok(Json(Ack::new("Sent")))
}
