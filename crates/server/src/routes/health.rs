use axum::{extract::State, http::StatusCode, Json};
use common::types::Health;
use tracing::info;

use crate::auth::ServerState;
use crate::errors::{JsonApiError, INTERNAL};

/// Subject of the diagnostic token minted by `/health`.
pub const HEALTH_SUBJECT: &str = "health-check";

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "Service is up; carries a fresh bearer token", body = crate::openapi::HealthResponse),
        (status = 500, description = "Token could not be signed")
    )
)]
pub async fn health(State(state): State<ServerState>) -> Result<Json<Health>, JsonApiError> {
    let token = state
        .tokens
        .issue(HEALTH_SUBJECT)
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL, Some(e.to_string())))?;
    info!(subject = HEALTH_SUBJECT, "health_token_issued");
    Ok(Json(Health { status: "ok", token: Some(token) }))
}
