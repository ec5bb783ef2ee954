use thiserror::Error;

/// Wire message for any rejected candidate or patch.
pub const INVALID_DATA: &str = "Invalid data";
/// Wire message for an empty bulk request.
pub const NO_ITEMS: &str = "Invalid data: no items in List";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn invalid_data() -> Self { Self::Validation(INVALID_DATA.to_string()) }
}
