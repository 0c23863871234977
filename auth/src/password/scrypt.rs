use scrypt::Params;

use super::errors::PasswordError;
use super::keys_match;
use super::policy::HashingPolicy;
use super::policy::SCRYPT_KEY_LEN;
use super::random_salt;
use super::record::CredentialRecord;

/// Cost parameters from the policy.
///
/// The length recorded here only matters for PHC strings. `scrypt::scrypt`
/// fills whatever output buffer it is given.
fn params(policy: &HashingPolicy) -> Result<Params, String> {
    Params::new(
        policy.scrypt_log_n,
        policy.scrypt_block_size,
        policy.scrypt_parallelism,
        SCRYPT_KEY_LEN,
    )
    .map_err(|e| format!("Invalid scrypt parameters: {}", e))
}

/// Derive a 64-byte scrypt key from the password and a fresh salt.
pub(super) fn hash(password: &str, policy: &HashingPolicy) -> Result<CredentialRecord, PasswordError> {
    let params = params(policy).map_err(PasswordError::HashingFailed)?;
    let salt = random_salt()?;

    let mut key = vec![0u8; SCRYPT_KEY_LEN];
    scrypt::scrypt(password.as_bytes(), &salt, &params, &mut key)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(CredentialRecord::Scrypt {
        salt: salt.to_vec(),
        key,
    })
}

/// Re-derive a key with the stored salt and compare it to the stored key.
///
/// The derived key is as long as the stored key, whatever its length.
pub(super) fn verify(
    password: &str,
    salt: &[u8],
    key: &[u8],
    policy: &HashingPolicy,
) -> Result<bool, PasswordError> {
    let params = params(policy).map_err(PasswordError::VerificationFailed)?;

    let mut derived = vec![0u8; key.len()];
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut derived)
        .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?;

    Ok(keys_match(&derived, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> HashingPolicy {
        HashingPolicy::new().with_scrypt_log_n(10)
    }

    #[test]
    fn test_hash_and_verify() {
        let policy = policy();
        let record = hash("my_secure_password", &policy).expect("Failed to hash password");

        let CredentialRecord::Scrypt { salt, key } = record else {
            panic!("expected a scrypt record");
        };
        assert_eq!(salt.len(), 16);
        assert_eq!(key.len(), 64);

        assert!(verify("my_secure_password", &salt, &key, &policy).unwrap());
        assert!(!verify("wrong_password", &salt, &key, &policy).unwrap());
    }

    fn key_of_len(password: &str, salt: &[u8], len: usize) -> Vec<u8> {
        let params = Params::new(10, 8, 1, SCRYPT_KEY_LEN).unwrap();
        let mut key = vec![0u8; len];
        scrypt::scrypt(password.as_bytes(), salt, &params, &mut key).unwrap();
        key
    }

    #[test]
    fn test_verify_uses_stored_key_length() {
        let policy = policy();
        let salt = [7u8; 16];

        for len in [16, 32, 64, 65, 128] {
            let key = key_of_len("abc123", &salt, len);
            assert!(
                verify("abc123", &salt, &key, &policy).unwrap(),
                "key of {} bytes should verify",
                len
            );
            assert!(!verify("abc124", &salt, &key, &policy).unwrap());
        }
    }

    #[test]
    fn test_long_stored_key_verifies_through_record() {
        let salt = [9u8; 16];
        let key = key_of_len("abc123", &salt, 128);
        let stored = crate::password::StoredCredential::new(
            format!("{}:{}", hex::encode(salt), hex::encode(&key)),
            None,
        );

        let hasher = crate::password::PasswordHasher::new(policy());
        assert!(hasher.verify_stored("abc123", &stored).unwrap());
        assert!(!hasher.verify_stored("abc124", &stored).unwrap());
    }

    #[test]
    fn test_default_cost_is_two_to_the_seventeenth() {
        let policy = HashingPolicy::new();
        let params = params(&policy).unwrap();
        assert_eq!(params.log_n(), 17);
        assert_eq!(params.r(), 8);
    }
}
