use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use social_types::identity::Identity;

use crate::error::ApiError;
use crate::session::{self, SESSION_COOKIE};
use crate::state::AppState;

/// Answer CORS for any origin: the caller's `Origin` is reflected back with
/// credentials allowed, and preflights short-circuit with 204.
///
/// Not `CorsLayer` with `AllowOrigin::mirror_request()`: that omits the header
/// when no `Origin` is sent, where clients here expect `*` alongside credentials.
pub async fn reflect_cors(request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Origin, X-Requested-With, Content-Type, Accept"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    response
}

/// Resolve the session cookie into an [`Identity`] request extension.
///
/// Only the token is consulted. A user blocked or demoted after login keeps
/// their old identity until the token runs out.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .ok_or(ApiError::Unauthorized("Authentication required"))?;

    let claims = session::verify(&token, &state.jwt_secret).map_err(|e| {
        debug!("Rejected session token: {}", e);
        ApiError::Unauthorized("Invalid or expired session")
    })?;

    request.extensions_mut().insert(Identity::from_claims(&claims));
    Ok(next.run(request).await)
}

/// Admin gate. Must sit inside [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<Identity>() {
        Some(identity) if identity.is_admin() => Ok(next.run(request).await),
        Some(_) => Err(ApiError::Forbidden("Admin access required")),
        None => Err(ApiError::Unauthorized("Authentication required")),
    }
}
