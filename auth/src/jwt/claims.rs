use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;
use crate::identity::Identity;
use crate::identity::Role;

/// Token payload: `{ id, role, iat, exp }`.
///
/// `id` and `role` are optional on the wire so that a correctly signed
/// token lacking them is reported as a missing claim instead of a decode
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// User role ("admin" or "user")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity, valid for `validity` from `issued_at`.
    pub fn for_identity(identity: &Identity, issued_at: DateTime<Utc>, validity: Duration) -> Self {
        Self {
            id: Some(identity.id.clone()),
            role: Some(identity.role.as_str().to_string()),
            iat: Some(issued_at.timestamp()),
            exp: (issued_at + validity).timestamp(),
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }

    /// Extract the identity these claims vouch for.
    ///
    /// # Errors
    /// * `MissingClaim` - `id` or `role` is absent or empty
    /// * `InvalidToken` - `role` is not a known role
    pub fn identity(&self) -> Result<Identity, JwtError> {
        let id = self
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| JwtError::MissingClaim("id".to_string()))?;

        let role = self
            .role
            .as_deref()
            .filter(|role| !role.is_empty())
            .ok_or_else(|| JwtError::MissingClaim("role".to_string()))?
            .parse::<Role>()
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        Ok(Identity::new(id, role))
    }
}
