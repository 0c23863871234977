use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Utc;

use crate::guard;
use crate::guard::AccessError;
use crate::identity::Identity;
use crate::identity::Role;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SigningSecret;
use crate::password::HashingPolicy;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::StoredCredential;

/// Authentication coordinator combining credential verification and token issuance.
///
/// Owns the hashing policy and the signing secret for the lifetime of the
/// process. Both are fixed at construction.
#[derive(Debug)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    decoy: OnceLock<StoredCredential>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed bearer token, valid for one hour
    pub access_token: String,
    /// Identity the token was issued for
    pub identity: Identity,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    pub fn new(secret: SigningSecret, policy: HashingPolicy) -> Self {
        Self {
            password_hasher: PasswordHasher::new(policy),
            jwt_handler: JwtHandler::new(&secret),
            decoy: OnceLock::new(),
        }
    }

    /// Build an authenticator from raw configuration values.
    ///
    /// # Errors
    /// * `MissingSecret` - The configured secret is blank
    pub fn from_config(secret: &str, policy: HashingPolicy) -> Result<Self, JwtError> {
        Ok(Self::new(SigningSecret::new(secret)?, policy))
    }

    pub fn policy(&self) -> &HashingPolicy {
        self.password_hasher.policy()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Every permitted algorithm failed
    pub fn hash_password(&self, password: &str) -> Result<StoredCredential, PasswordError> {
        let record = self.password_hasher.hash(password)?;
        Ok(record.to_stored())
    }

    /// Check a password against a stored credential of any supported format.
    pub fn verify_password(
        &self,
        password: &str,
        stored: &StoredCredential,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify_stored(password, stored)
    }

    /// Verify credentials and issue a token for `identity`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored` - Credential persisted for the account
    /// * `identity` - Identity to vouch for on success
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - The stored credential could not be checked
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored: &StoredCredential,
        identity: Identity,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(&identity)?;

        Ok(AuthenticationResult {
            access_token,
            identity,
        })
    }

    /// Run a full verification against a decoy credential.
    ///
    /// Called when no account matches a login so that an unknown account
    /// costs as much as a wrong password. The decoy is hashed under the
    /// current policy on first use.
    pub fn verify_decoy(&self, password: &str) -> Result<(), PasswordError> {
        let decoy = match self.decoy.get() {
            Some(decoy) => decoy,
            None => {
                let fresh = self.hash_password(DECOY_PASSWORD)?;
                self.decoy.get_or_init(|| fresh)
            }
        };

        self.verify_password(password, decoy)?;
        Ok(())
    }

    pub fn issue_token(&self, identity: &Identity) -> Result<String, JwtError> {
        self.jwt_handler.issue(identity)
    }

    /// Validate a token and return the identity it carries.
    pub fn validate_token(&self, token: &str) -> Result<Identity, JwtError> {
        self.jwt_handler.verify(token)
    }

    /// Authenticate a request from its `Authorization` header.
    pub fn authorize(
        &self,
        attached: Option<&Identity>,
        header: Option<&str>,
    ) -> Result<Identity, AccessError> {
        guard::authenticate(attached, header, &self.jwt_handler)
    }

    pub fn authorize_at(
        &self,
        attached: Option<&Identity>,
        header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, AccessError> {
        guard::authenticate_at(attached, header, &self.jwt_handler, now)
    }

    /// Authenticate a request and require the administrator role.
    pub fn authorize_admin(
        &self,
        attached: Option<&Identity>,
        header: Option<&str>,
    ) -> Result<Identity, AccessError> {
        let identity = self.authorize(attached, header)?;
        guard::require_role(&identity, Role::Admin)?;
        Ok(identity)
    }
}
