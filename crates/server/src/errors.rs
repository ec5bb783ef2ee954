use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::AuthError;
use service::errors::{ServiceError, INVALID_DATA};
use thiserror::Error;
use tracing::{debug, error};

pub const NOT_FOUND: &str = "Operation not found";
pub const INTERNAL: &str = "Internal Server Error";
pub const TOKEN_MISSING: &str = "Token is missing";
pub const TOKEN_INVALID: &str = "Invalid Token";

/// JSON error body `{"error": ...}`. `detail` goes to the log only.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, error: error.into(), detail }
    }

    pub fn invalid_data(detail: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_DATA, detail)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND, None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = ?self.detail, "request_failed");
        } else {
            debug!(status = %self.status, detail = ?self.detail, "request_rejected");
        }
        (self.status, Json(serde_json::json!({"error": self.error}))).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            // Bulk's empty-list message is the only validation text that differs.
            ServiceError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, msg, None),
            ServiceError::NotFound(_) => JsonApiError::not_found(),
            ServiceError::Model(models::errors::ModelError::Validation(msg)) => JsonApiError::invalid_data(Some(msg)),
            other => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL, Some(other.to_string())),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let error = match e {
            AuthError::Missing => TOKEN_MISSING,
            AuthError::Invalid(_) | AuthError::Token(_) => TOKEN_INVALID,
        };
        JsonApiError::new(StatusCode::FORBIDDEN, error, Some(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
