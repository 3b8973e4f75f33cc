//! Request body extraction that keeps every failure inside [`ApiError`].

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, StatusCode, header},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::debug;

use crate::error::ApiError;

/// JSON body that reads as `T::default()` when the request carries no JSON:
/// a missing body, an empty one, or a non-JSON content type. Controllers then
/// answer with their own missing-field errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!("Rejected request body: {}", e);
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge
            } else {
                ApiError::BadRequest("Invalid request body")
            }
        })?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice(&bytes).map(Self).map_err(|e| {
            debug!("Rejected JSON body: {}", e);
            match e.classify() {
                Category::Syntax | Category::Eof | Category::Io => {
                    ApiError::BadRequest("Malformed JSON body")
                }
                Category::Data => ApiError::BadRequest("Invalid request body"),
            }
        })
    }
}
