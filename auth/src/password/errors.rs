use thiserror::Error;

/// Error type for password operations.
///
/// A wrong password is never an error: verification returns `Ok(false)`.
/// These variants describe genuine faults.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Malformed credential record: {0}")]
    MalformedRecord(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
