pub mod argon2;
pub mod bcrypt;
pub mod errors;
pub mod hasher;
pub mod pbkdf2;
pub mod policy;
pub mod record;
pub mod scrypt;

use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

pub use errors::PasswordError;
pub use hasher::PasswordHasher;
pub use policy::HashingPolicy;
pub use record::Algorithm;
pub use record::CredentialRecord;
pub use record::StoredCredential;

use policy::SALT_LEN;

/// Fresh random salt from the operating system CSPRNG.
pub(crate) fn random_salt() -> Result<[u8; SALT_LEN], PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| PasswordError::HashingFailed(format!("Failed to generate salt: {}", e)))?;
    Ok(salt)
}

/// Constant-time comparison of a re-derived key against a stored key.
///
/// Keys of any length compare. A length mismatch never matches.
pub(crate) fn keys_match(derived: &[u8], stored: &[u8]) -> bool {
    derived.len() == stored.len() && bool::from(derived.ct_eq(stored))
}
