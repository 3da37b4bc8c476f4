//! HS256 JWT validation.
//!
//! Tokens are issued elsewhere; this service only verifies them and reads the caller id
//! from the `sub` claim.

use crate::auth::models::JwtClaims;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;
use vidstage_core::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(authorization: Option<&str>) -> Result<&str, AppError> {
    let header = authorization
        .ok_or_else(|| AppError::Unauthenticated("Couldn't find JWT".to_string()))?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or_else(|| {
            AppError::Unauthenticated(
                "Invalid authorization header format. Expected: Bearer <token>".to_string(),
            )
        })?;

    if token.is_empty() {
        return Err(AppError::Unauthenticated("Couldn't find JWT".to_string()));
    }

    Ok(token)
}

#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthenticated("Token has expired".to_string())
                    }
                    _ => AppError::Unauthenticated("Couldn't validate JWT".to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Resolve the caller's user id from a raw `Authorization` header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Uuid, AppError> {
        let token = parse_bearer(authorization)?;
        let claims = self.validate_token(token)?;
        Ok(claims.sub)
    }
}
