use thiserror::Error;

/// Why a request could not be authenticated
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token is missing")]
    Missing,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token error: {0}")]
    Token(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Missing => 1001,
            AuthError::Invalid(_) => 1004,
            AuthError::Token(_) => 1102,
        }
    }
}
