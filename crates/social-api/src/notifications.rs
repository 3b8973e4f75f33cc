use axum::{
    Extension, Json,
    extract::{Query, State},
};

use social_types::api::{NextQuery, NotificationsResponse};
use social_types::identity::Identity;

use crate::error::ApiError;
use crate::state::AppState;

const NOTIFICATION_LIMIT: u32 = 10;

/// GET /api/notifications?next=
///
/// `next` is echoed for the client to redirect to.
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<NextQuery>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let user_id = identity.id();
    let notifications = state
        .run_db(move |db| db.recent_notifications(user_id, NOTIFICATION_LIMIT))
        .await
        .map_err(|e| ApiError::internal("Notifications error", e))?;

    Ok(Json(NotificationsResponse {
        notifications,
        next: query.next,
    }))
}
