//! Bearer-token access guard.
//!
//! Framework-independent decisions behind the HTTP middleware: turn an
//! `Authorization` header into an [`Identity`] or a rejection, and enforce
//! role restrictions on an already authenticated identity.

use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::identity::Identity;
use crate::identity::Role;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Reasons a request is refused.
///
/// All variants except `Forbidden` are authentication failures (401);
/// `Forbidden` is an authorization failure (403).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Access denied: no bearer token provided")]
    MissingCredential,

    #[error("Access denied: invalid or malformed token")]
    InvalidCredential,

    #[error("Session expired, please log in again")]
    ExpiredCredential,

    #[error("Access denied: administrator permissions required")]
    Forbidden,
}

impl AccessError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AccessError::Forbidden)
    }
}

impl From<JwtError> for AccessError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AccessError::ExpiredCredential,
            _ => AccessError::InvalidCredential,
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// # Errors
/// * `MissingCredential` - No header, another scheme, or an empty token
pub fn bearer_token(header: Option<&str>) -> Result<&str, AccessError> {
    let token = header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AccessError::MissingCredential)?;

    if token.is_empty() {
        return Err(AccessError::MissingCredential);
    }

    Ok(token)
}

/// Authenticate a request.
///
/// An identity attached by an upstream layer is admitted as-is without
/// looking at the header again.
///
/// # Arguments
/// * `attached` - Identity already present on the request, if any
/// * `header` - Raw `Authorization` header value
/// * `jwt_handler` - Verifier for bearer tokens
///
/// # Errors
/// * `MissingCredential` - No bearer token
/// * `InvalidCredential` - Bad signature, malformed token or missing claims
/// * `ExpiredCredential` - Token lifetime is over
pub fn authenticate(
    attached: Option<&Identity>,
    header: Option<&str>,
    jwt_handler: &JwtHandler,
) -> Result<Identity, AccessError> {
    authenticate_at(attached, header, jwt_handler, Utc::now())
}

pub fn authenticate_at(
    attached: Option<&Identity>,
    header: Option<&str>,
    jwt_handler: &JwtHandler,
    now: DateTime<Utc>,
) -> Result<Identity, AccessError> {
    if let Some(identity) = attached {
        return Ok(identity.clone());
    }

    let token = bearer_token(header)?;
    let identity = jwt_handler.verify_at(token, now)?;

    tracing::debug!(user_id = %identity.id, role = %identity.role, "Bearer token accepted");

    Ok(identity)
}

/// Require an authenticated identity to hold `role`.
///
/// # Errors
/// * `Forbidden` - The identity has a different role
pub fn require_role(identity: &Identity, role: Role) -> Result<(), AccessError> {
    if identity.role != role {
        return Err(AccessError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::jwt::SigningSecret;

    fn handler() -> JwtHandler {
        JwtHandler::new(&SigningSecret::new("guard_secret_key_at_least_32_bytes!").unwrap())
    }

    fn header(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[test]
    fn test_missing_header() {
        let result = authenticate(None, None, &handler());
        assert_eq!(result, Err(AccessError::MissingCredential));
    }

    #[test]
    fn test_non_bearer_scheme() {
        let result = authenticate(None, Some("Basic dXNlcjpwYXNz"), &handler());
        assert_eq!(result, Err(AccessError::MissingCredential));

        let result = authenticate(None, Some("Bearer "), &handler());
        assert_eq!(result, Err(AccessError::MissingCredential));
    }

    #[test]
    fn test_malformed_token() {
        let result = authenticate(None, Some("Bearer not-a-jwt"), &handler());
        assert_eq!(result, Err(AccessError::InvalidCredential));
    }

    #[test]
    fn test_valid_token() {
        let handler = handler();
        let identity = Identity::new("user123", Role::User);
        let token = handler.issue(&identity).unwrap();

        let result = authenticate(None, Some(&header(&token)), &handler);
        assert_eq!(result, Ok(identity));
    }

    #[test]
    fn test_expired_token_is_distinct_from_invalid() {
        let handler = handler();
        let identity = Identity::new("user123", Role::User);
        let issued_at = Utc::now();
        let token = handler.issue_at(&identity, issued_at).unwrap();

        let result = authenticate_at(
            None,
            Some(&header(&token)),
            &handler,
            issued_at + Duration::minutes(61),
        );
        assert_eq!(result, Err(AccessError::ExpiredCredential));
        assert_ne!(
            AccessError::ExpiredCredential.to_string(),
            AccessError::InvalidCredential.to_string()
        );
    }

    #[test]
    fn test_token_missing_claims_is_invalid() {
        let handler = handler();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = handler
            .encode(&serde_json::json!({ "role": "admin", "exp": exp }))
            .unwrap();

        let result = authenticate(None, Some(&header(&token)), &handler);
        assert_eq!(result, Err(AccessError::InvalidCredential));
    }

    #[test]
    fn test_attached_identity_short_circuits() {
        let attached = Identity::new("upstream", Role::Admin);

        let result = authenticate(Some(&attached), Some("Bearer garbage"), &handler());
        assert_eq!(result, Ok(attached));
    }

    #[test]
    fn test_admin_guard() {
        let user = Identity::new("1", Role::User);
        let admin = Identity::new("2", Role::Admin);

        assert_eq!(
            require_role(&user, Role::Admin),
            Err(AccessError::Forbidden)
        );
        assert_eq!(require_role(&admin, Role::Admin), Ok(()));
        assert!(AccessError::Forbidden.is_forbidden());
    }
}
