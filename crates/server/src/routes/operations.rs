use axum::{
    body::Bytes,
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    Json,
};
use serde_json::Value;
use service::audit::AuditEntry;
use service::operations::{BulkResult, DeleteConfirmation, Operation, OperationFilter};
use service::pagination::Pagination;
use tracing::info;

use crate::auth::ServerState;
use crate::errors::JsonApiError;

fn body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, JsonApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| JsonApiError::invalid_data(Some(e.body_text())))
}

// Non-numeric ids cannot name an operation.
fn operation_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, JsonApiError> {
    id.map(|Path(id)| id).map_err(|_| JsonApiError::not_found())
}

/// Empty body and `null` mean "no filter".
fn filter_from(raw: &[u8]) -> Result<OperationFilter, JsonApiError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(OperationFilter::default());
    }
    serde_json::from_slice::<Option<OperationFilter>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|e| JsonApiError::invalid_data(Some(e.to_string())))
}

#[utoipa::path(
    post, path = "/operations", tag = "operations",
    request_body = crate::openapi::CandidateDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::OperationDoc),
        (status = 400, description = "Invalid data", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Token missing or invalid", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Operation>, JsonApiError> {
    let candidate = body(payload)?;
    Ok(Json(state.store.create(&candidate).await?))
}

#[utoipa::path(
    post, path = "/operations/bulk", tag = "operations",
    request_body = Vec<crate::openapi::CandidateDoc>,
    responses(
        (status = 200, description = "Valid items stored, invalid items echoed back", body = crate::openapi::BulkResultDoc),
        (status = 400, description = "Body is not a non-empty array", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Token missing or invalid", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_bulk(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BulkResult>, JsonApiError> {
    let Value::Array(items) = body(payload)? else {
        return Err(JsonApiError::invalid_data(Some("bulk body must be an array".into())));
    };
    let result = state.store.create_bulk(items).await?;
    info!(created = result.created.len(), rejected = result.rejected.len(), "bulk_request_done");
    Ok(Json(result))
}

#[utoipa::path(
    get, path = "/operations/{id}", tag = "operations",
    params(("id" = i32, Path, description = "Operation id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::OperationDoc),
        (status = 404, description = "Operation not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Operation>, JsonApiError> {
    let id = operation_id(id)?;
    Ok(Json(state.store.get_by_id(id).await?))
}

/// Paged listing. The optional JSON body narrows the result.
#[utoipa::path(
    get, path = "/operations", tag = "operations",
    params(
        ("page" = Option<u32>, Query, description = "1-based page, default 1"),
        ("per_page" = Option<u32>, Query, description = "Page size, default 10, at most 100")
    ),
    request_body(content = crate::openapi::FilterDoc, description = "Optional filter"),
    responses(
        (status = 200, description = "OK", body = Vec<crate::openapi::OperationDoc>),
        (status = 400, description = "Invalid data", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<Pagination>, QueryRejection>,
    raw: Bytes,
) -> Result<Json<Vec<Operation>>, JsonApiError> {
    let Query(pagination) = query.map_err(|e| JsonApiError::invalid_data(Some(e.body_text())))?;
    let filter = filter_from(&raw)?;
    Ok(Json(state.store.list(pagination, filter).await?))
}

#[utoipa::path(
    put, path = "/operations/{id}", tag = "operations",
    params(("id" = i32, Path, description = "Operation id")),
    request_body = crate::openapi::CandidateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::OperationDoc),
        (status = 400, description = "Invalid data", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Operation not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Operation>, JsonApiError> {
    let id = operation_id(id)?;
    let patch = body(payload)?;
    Ok(Json(state.store.update(id, &patch).await?))
}

#[utoipa::path(
    delete, path = "/operations/{id}", tag = "operations",
    params(("id" = i32, Path, description = "Operation id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::DeleteConfirmationDoc),
        (status = 404, description = "Operation not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteConfirmation>, JsonApiError> {
    let id = operation_id(id)?;
    Ok(Json(state.store.delete(id).await?))
}

#[utoipa::path(
    get, path = "/operations/{id}/history", tag = "operations",
    params(("id" = i32, Path, description = "Operation id, live or deleted")),
    responses(
        (status = 200, description = "Audit trail, oldest first", body = Vec<crate::openapi::AuditEntryDoc>)
    )
)]
pub async fn history(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<AuditEntry>>, JsonApiError> {
    let id = operation_id(id)?;
    Ok(Json(state.store.history(id).await?))
}
