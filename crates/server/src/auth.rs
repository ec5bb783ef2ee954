use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use service::auth::TokenService;
use service::operations::OperationStore;
use tracing::warn;

use crate::errors::JsonApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn OperationStore>,
    pub tokens: Arc<TokenService>,
}

/// Guard for the operation routes: requires `Authorization: Bearer <jwt>`
/// with a valid signature and unexpired `exp`. Failures answer 403.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let header = req.headers().get(AUTHORIZATION).map(|v| v.as_bytes());
    if let Err(e) = state.tokens.authorize(header) {
        warn!(path = %req.uri().path(), code = e.code(), err = %e, "token validation failed");
        return Err(e.into());
    }
    Ok(next.run(req).await)
}
