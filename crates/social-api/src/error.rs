use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Every way a request can fail, mapped onto the status codes clients see.
///
/// `Internal` hands the underlying error text back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Request body too large")]
    PayloadTooLarge,
    #[error("Slow down")]
    TooManyRequests,
    #[error("Server error: {0}")]
    Internal(anyhow::Error),
    /// Same as `Internal` without echoing the cause.
    #[error("Server error: {0}")]
    InternalQuiet(anyhow::Error),
}

impl ApiError {
    /// Log `err` under `context` and wrap it for the client.
    pub fn internal(context: &'static str, err: impl Into<anyhow::Error>) -> Self {
        let err = err.into();
        error!("{}: {:#}", context, err);
        Self::Internal(err)
    }

    pub fn internal_quiet(context: &'static str, err: impl Into<anyhow::Error>) -> Self {
        let err = err.into();
        error!("{}: {:#}", context, err);
        Self::InternalQuiet(err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) | Self::InternalQuiet(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Internal(err) => json!({ "message": "Server error", "error": err.to_string() }),
            Self::InternalQuiet(_) => json!({ "message": "Server error" }),
            other => json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
