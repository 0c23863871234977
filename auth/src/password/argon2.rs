use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;
use super::policy::HashingPolicy;
use super::record::CredentialRecord;

/// Hash a password with Argon2id using the policy's cost parameters.
///
/// # Returns
/// PHC string record (includes algorithm, parameters, salt, and hash)
///
/// # Errors
/// * `HashingFailed` - Parameters are invalid or hashing failed
pub(super) fn hash(password: &str, policy: &HashingPolicy) -> Result<CredentialRecord, PasswordError> {
    let params = Params::new(
        policy.argon2_memory_kib,
        policy.argon2_time_cost,
        policy.argon2_parallelism,
        None,
    )
    .map_err(|e| PasswordError::HashingFailed(format!("Invalid argon2 parameters: {}", e)))?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| CredentialRecord::Argon2id {
            hash: hash.to_string(),
        })
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// Verify a password against an Argon2 PHC string.
///
/// Variant, version and cost are read from the PHC string itself.
///
/// # Errors
/// * `MalformedRecord` - The PHC string cannot be parsed
/// * `VerificationFailed` - The embedded parameters are unusable
pub(super) fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::MalformedRecord(format!("Invalid argon2 hash: {}", e)))?;
    if parsed_hash.hash.is_none() {
        return Err(PasswordError::MalformedRecord(
            "Argon2 hash has no output segment".to_string(),
        ));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}
