use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use tracing::info;

use social_types::api::{Ack, LoginRequest, LoginResponse, NextQuery, SessionUser};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::session;
use crate::state::AppState;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// POST /api/auth/login
///
/// Plaintext credential check, then a one-hour
/// session cookie. `next` comes back untouched for the client to follow.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let next = non_empty(query.next).or(non_empty(req.next));

    let (Some(email), Some(password)) = (non_empty(req.email), non_empty(req.password)) else {
        return Err(ApiError::BadRequest("Email and password required"));
    };

    let user = state
        .run_db(move |db| db.find_user_by_email(&email))
        .await
        .map_err(|e| ApiError::internal("Login error", e))?;

    let user = match user {
        Some(user) if user.password == password => user,
        _ => return Err(ApiError::Unauthorized("Invalid credentials")),
    };

    if user.blocked {
        return Err(ApiError::Forbidden("Account blocked"));
    }

    let session_user = SessionUser {
        id: user.id,
        email: user.email,
        role: user.role,
    };
    let token = session::issue(&state.jwt_secret, &session_user, Utc::now())
        .map_err(|e| ApiError::internal("Login error", e))?;

    info!(user_id = session_user.id, "User logged in");

    Ok((
        jar.add(session::session_cookie(token)),
        Json(LoginResponse {
            message: "Logged in".into(),
            user: session_user,
            next,
        }),
    ))
}

/// POST /api/auth/logout
///
/// Only the client's cookie goes away; the token
/// itself stays valid until it expires.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Ack>) {
    (
        jar.remove(session::cleared_cookie()),
        Json(Ack::new("Logged out")),
    )
}
