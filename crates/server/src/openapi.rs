use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Bearer token accepted by the operation routes.
    pub token: String,
}

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

/// Create body, also used as the update patch. On update the create rules
/// still apply; an empty or null `description` keeps the stored one.
#[derive(ToSchema)]
pub struct CandidateDoc {
    pub operation_type: String,
    pub amount: f64,
    /// RFC 3339, naive date-time or date. Ignored on update.
    pub occurred_at: Option<String>,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct OperationDoc {
    pub id: i32,
    pub operation_type: String,
    pub amount: f64,
    pub occurred_at: String,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct FilterDoc {
    /// Exact match.
    pub operation_type: Option<String>,
    /// Exact match.
    pub amount: Option<f64>,
    /// Substring match.
    pub description: Option<String>,
    /// Exact match.
    pub occurred_at: Option<String>,
}

#[derive(ToSchema)]
pub struct BulkResultDoc {
    pub created: Vec<OperationDoc>,
    /// Rejected items exactly as sent.
    pub rejected: Vec<serde_json::Value>,
}

#[derive(ToSchema)]
pub struct DeleteConfirmationDoc { pub success: String, pub id: i32 }

#[derive(ToSchema)]
pub struct AuditEntryDoc {
    pub id: i32,
    pub operation_id: i32,
    pub timestamp: String,
    /// `created`, `updated` or `deleted`.
    pub change_kind: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::operations::create,
        crate::routes::operations::create_bulk,
        crate::routes::operations::get,
        crate::routes::operations::list,
        crate::routes::operations::update,
        crate::routes::operations::delete,
        crate::routes::operations::history,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            CandidateDoc,
            OperationDoc,
            FilterDoc,
            BulkResultDoc,
            DeleteConfirmationDoc,
            AuditEntryDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "operations")
    )
)]
pub struct ApiDoc;
