use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;
use crate::identity::Identity;

/// Lifetime of every issued token.
pub const TOKEN_VALIDITY_SECONDS: i64 = 60 * 60;

/// Server-held symmetric signing secret.
///
/// Cannot be constructed empty, so a handler never signs with a blank key.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Wrap a configured secret.
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty or only whitespace
    pub fn new(secret: impl Into<String>) -> Result<Self, JwtError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(JwtError::MissingSecret);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(****)")
    }
}

/// JWT token handler for issuing and verifying bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a single shared secret.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validity: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with a signing secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            validity: Duration::seconds(TOKEN_VALIDITY_SECONDS),
        }
    }

    /// Issue a token for an identity, valid for one hour from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, JwtError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<String, JwtError> {
        self.encode(&Claims::for_identity(identity, issued_at, self.validity))
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token against the current time.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now())
    }

    /// Decode and validate a JWT token against the given time.
    ///
    /// The signature is checked before expiry, so an expired token with a
    /// forged signature is reported as invalid.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature is invalid or the token is malformed
    /// * `TokenExpired` - `exp` is earlier than `now`
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the supplied clock
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        if token_data.claims.is_expired(now.timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }

    /// Verify a token and extract its identity.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, malformed token or unknown role
    /// * `TokenExpired` - Token lifetime is over
    /// * `MissingClaim` - `id` or `role` is absent
    pub fn verify(&self, token: &str) -> Result<Identity, JwtError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, JwtError> {
        self.decode_at(token, now)?.identity()
    }
}

impl fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtHandler")
            .field("algorithm", &self.algorithm)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}
