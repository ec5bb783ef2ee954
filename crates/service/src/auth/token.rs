use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::AuthError;

/// Token service configuration
#[derive(Clone, Debug)]
pub struct TokenConfig {
    pub jwt_secret: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and checks HS256 tokens with an expiry.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(cfg: &TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            ttl: cfg.ttl,
        }
    }

    /// Sign a token for `subject` that expires after the configured TTL.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{TokenConfig, TokenService};
    /// use std::time::Duration;
    /// let tokens = TokenService::new(&TokenConfig { jwt_secret: "secret".into(), ttl: Duration::from_secs(60) });
    /// let token = tokens.issue("health-check").unwrap();
    /// assert_eq!(tokens.verify(&token).unwrap().sub, "health-check");
    /// ```
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp().max(0) as usize;
        let claims = Claims { sub: subject.to_string(), iat: now, exp: now + self.ttl.as_secs() as usize };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(err = %e, "token_rejected");
                AuthError::Invalid(e.to_string())
            })
    }
}

impl TokenService {
    /// Authenticate a raw `Authorization` header value. An absent or blank
    /// header is [`AuthError::Missing`]; anything else that does not carry a
    /// verifiable bearer token is [`AuthError::Invalid`].
    pub fn authorize(&self, header: Option<&[u8]>) -> Result<Claims, AuthError> {
        let raw = header.ok_or(AuthError::Missing)?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(AuthError::Missing);
        }
        let value = std::str::from_utf8(raw).map_err(|_| AuthError::Invalid("header is not valid UTF-8".into()))?;
        let token = bearer_token(value).ok_or_else(|| AuthError::Invalid("expected Bearer scheme".into()))?;
        self.verify(token)
    }
}

/// Extract the credential from an `Authorization` value. The scheme is
/// matched case-insensitively; anything but `Bearer <token>` yields `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
