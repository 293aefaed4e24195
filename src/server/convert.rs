//! Mapping of [`ImgcacheError`] onto HTTP responses.
//!
//! | error | status | body |
//! |---|---|---|
//! | `Validation` | 400 | `{"error": "Invalid query parameter"}` / `{"error": "Invalid page or per_page parameter"}` |
//! | `Upstream` | upstream status | `{"error": <upstream message>}` |
//! | anything else | 500 | `{"error": "Internal Server Error"}` |
//!
//! Internal failures are logged with full detail but never echoed back.
//! Throttled requests never get here: the rate limiting middleware answers
//! them itself with [`too_many_requests`] and the configured message.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::ImgcacheError;

/// Body returned to callers on internal failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An [`ImgcacheError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub ImgcacheError);

impl From<ImgcacheError> for ApiError {
    fn from(err: ImgcacheError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            ImgcacheError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ImgcacheError::Upstream { status, message } => {
                warn!(status, %message, "image provider returned an error");
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, message)
            }
            other => {
                error!(error = %other, "error fetching images");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Plain-text 429 with a `retry-after` header (whole seconds, rounded up).
pub fn too_many_requests(message: &str, retry_after: Option<std::time::Duration>) -> Response {
    let mut response = (StatusCode::TOO_MANY_REQUESTS, message.to_string()).into_response();
    if let Some(wait) = retry_after {
        let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
        if let Ok(value) = secs.to_string().parse() {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}
