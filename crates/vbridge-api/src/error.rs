//! API error handling
//!
//! Maps local failures onto the wire taxonomy: malformed input is 400 with a
//! detail string, backend failures are 500 carrying the raw error message
//! and a diagnostic trace. The trace is exposed to the caller on purpose,
//! matching the behavior browser-side tooling already depends on.
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use vbridge_core::BridgeError;

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Caller error: unparsable body, missing or invalid field
    BadRequest(String),
    /// Backend failure during provisioning or upsert
    Backend(BridgeError),
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest(detail.into())
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        match err {
            // The gateway rejects unknown collections before any backend
            // call; that is caller input, not a backend failure.
            BridgeError::UnknownCollection(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::Backend(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "ok": false,
                    "error": "bad request",
                    "detail": detail,
                })),
            )
                .into_response(),
            ApiError::Backend(err) => {
                tracing::error!(error = %err, "backend call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "ok": false,
                        "error": err.to_string(),
                        "trace": format!("{err:?}"),
                    })),
                )
                    .into_response()
            }
        }
    }
}
