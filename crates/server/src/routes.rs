use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::auth::{require_bearer_token, ServerState};
use crate::openapi::ApiDoc;

pub mod health;
pub mod operations;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public health/docs routes and the
/// token-guarded operation routes.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let protected = Router::new()
        .route("/operations", get(operations::list).post(operations::create))
        .route("/operations/bulk", post(operations::create_bulk))
        .route(
            "/operations/:id",
            get(operations::get).put(operations::update).delete(operations::delete),
        )
        .route("/operations/:id/history", get(operations::history))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token));

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
