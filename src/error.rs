//! HTTP-facing error type. Every handler returns `Result<_, ApiError>`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing parameter, unparsable body or malformed id.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Logged in full, reported to the client as a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing(param: &str) -> Self {
        Self::InvalidInput(format!("invalid argument {param}"))
    }

    pub fn bad_body() -> Self {
        Self::InvalidInput("invalid request body".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a store failure, naming the resource in not-found messages.
    pub fn from_store(e: StoreError, resource: &str) -> Self {
        match e {
            StoreError::InvalidArgument(msg) => Self::InvalidInput(msg),
            StoreError::NotFound => Self::NotFound(format!("{resource} not found")),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Password(msg) => Self::Internal(msg),
            StoreError::Database(e) => Self::Internal(e.to_string()),
        }
    }
}

/// Rejects a blank path parameter with `invalid argument <name>`.
pub fn required(value: String, name: &str) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        warn!(param = name, "missing path parameter");
        return Err(ApiError::missing(name));
    }
    Ok(value)
}

/// Unwraps a JSON body, turning any extractor rejection into a 400.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(v)| v).map_err(|e| {
        warn!(error = %e, "rejected request body");
        ApiError::bad_body()
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
