use super::argon2;
use super::bcrypt;
use super::errors::PasswordError;
use super::pbkdf2;
use super::policy::HashingPolicy;
use super::record::Algorithm;
use super::record::CredentialRecord;
use super::record::StoredCredential;
use super::scrypt;

/// Password hashing implementation.
///
/// Encodes new credentials with the first algorithm of the policy's chain
/// that succeeds, and verifies any record the chain has ever produced.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    policy: HashingPolicy,
}

impl PasswordHasher {
    /// Create a new password hasher.
    ///
    /// # Arguments
    /// * `policy` - Algorithm selection and cost parameters
    ///
    /// # Returns
    /// PasswordHasher instance
    pub fn new(policy: HashingPolicy) -> Self {
        Self { policy }
    }

    /// Get the hashing policy in effect.
    pub fn policy(&self) -> &HashingPolicy {
        &self.policy
    }

    /// Hash a plaintext password into a credential record.
    ///
    /// In regulated mode only PBKDF2 is attempted. Otherwise each algorithm
    /// of the preference chain is tried in order and the first success wins.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Credential record tagged with the algorithm that produced it
    ///
    /// # Errors
    /// * `HashingFailed` - The regulated algorithm failed, or every
    ///   algorithm of the chain failed
    pub fn hash(&self, password: &str) -> Result<CredentialRecord, PasswordError> {
        if self.policy.is_regulated() {
            return pbkdf2::hash(password, &self.policy).map_err(|e| {
                tracing::error!(error = %e, "Regulated password hashing failed");
                e
            });
        }

        let mut last_error = None;
        for &algorithm in self.policy.preference() {
            match self.hash_with(algorithm, password) {
                Ok(record) => return Ok(record),
                Err(e) => {
                    tracing::warn!(
                        algorithm = %algorithm,
                        error = %e,
                        "Password hashing failed, trying next algorithm"
                    );
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no algorithm configured".to_string());

        Err(PasswordError::HashingFailed(format!(
            "All password hashing algorithms failed: {}",
            reason
        )))
    }

    fn hash_with(
        &self,
        algorithm: Algorithm,
        password: &str,
    ) -> Result<CredentialRecord, PasswordError> {
        match algorithm {
            Algorithm::Argon2id => argon2::hash(password, &self.policy),
            Algorithm::Scrypt => scrypt::hash(password, &self.policy),
            Algorithm::Bcrypt => bcrypt::hash(password, &self.policy),
            Algorithm::Pbkdf2 => pbkdf2::hash(password, &self.policy),
        }
    }

    /// Verify a password against a parsed credential record.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `record` - Parsed credential record
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedRecord` - The record's embedded data is corrupt
    /// * `VerificationFailed` - The underlying algorithm failed
    pub fn verify(&self, password: &str, record: &CredentialRecord) -> Result<bool, PasswordError> {
        match record {
            CredentialRecord::Argon2id { hash } => argon2::verify(password, hash),
            CredentialRecord::Scrypt { salt, key } => {
                scrypt::verify(password, salt, key, &self.policy)
            }
            CredentialRecord::Bcrypt { hash } => bcrypt::verify(password, hash),
            CredentialRecord::Pbkdf2 { salt, key } => {
                pbkdf2::verify(password, salt, key, &self.policy)
            }
        }
    }

    /// Parse a stored credential and verify a password against it.
    ///
    /// # Errors
    /// * `MalformedRecord` - The stored text matches no known encoding
    /// * `VerificationFailed` - The underlying algorithm failed
    pub fn verify_stored(
        &self,
        password: &str,
        stored: &StoredCredential,
    ) -> Result<bool, PasswordError> {
        let record = CredentialRecord::parse(stored)?;
        self.verify(password, &record)
    }
}
