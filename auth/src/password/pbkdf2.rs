use sha2::Sha256;

use super::errors::PasswordError;
use super::keys_match;
use super::policy::HashingPolicy;
use super::policy::PBKDF2_KEY_LEN;
use super::random_salt;
use super::record::CredentialRecord;

fn derive(password: &str, salt: &[u8], iterations: u32, output: &mut [u8]) {
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, output);
}

/// Derive a 32-byte PBKDF2-HMAC-SHA256 key from the password and a fresh salt.
pub(super) fn hash(password: &str, policy: &HashingPolicy) -> Result<CredentialRecord, PasswordError> {
    if policy.pbkdf2_iterations == 0 {
        return Err(PasswordError::HashingFailed(
            "PBKDF2 iteration count must be positive".to_string(),
        ));
    }

    let salt = random_salt()?;
    let mut key = vec![0u8; PBKDF2_KEY_LEN];
    derive(password, &salt, policy.pbkdf2_iterations, &mut key);

    Ok(CredentialRecord::Pbkdf2 {
        salt: salt.to_vec(),
        key,
    })
}

pub(super) fn verify(
    password: &str,
    salt: &[u8],
    key: &[u8],
    policy: &HashingPolicy,
) -> Result<bool, PasswordError> {
    if policy.pbkdf2_iterations == 0 {
        return Err(PasswordError::VerificationFailed(
            "PBKDF2 iteration count must be positive".to_string(),
        ));
    }

    let mut derived = vec![0u8; key.len()];
    derive(password, salt, policy.pbkdf2_iterations, &mut derived);

    Ok(keys_match(&derived, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let policy = HashingPolicy::new().with_pbkdf2_iterations(1_000);
        let record = hash("my_secure_password", &policy).expect("Failed to hash password");

        let CredentialRecord::Pbkdf2 { salt, key } = record else {
            panic!("expected a pbkdf2 record");
        };
        assert_eq!(salt.len(), 16);
        assert_eq!(key.len(), 32);

        assert!(verify("my_secure_password", &salt, &key, &policy).unwrap());
        assert!(!verify("wrong_password", &salt, &key, &policy).unwrap());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let salt = [42u8; 16];
        let mut key1 = [0u8; 32];
        let mut key2 = [0u8; 32];
        derive("my-passphrase", &salt, 1_000, &mut key1);
        derive("my-passphrase", &salt, 1_000, &mut key2);
        assert_eq!(key1, key2);

        let mut key3 = [0u8; 32];
        derive("my-passphrase", &[99u8; 16], 1_000, &mut key3);
        assert_ne!(key1, key3);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let policy = HashingPolicy::new().with_pbkdf2_iterations(0);
        assert!(matches!(
            hash("password", &policy),
            Err(PasswordError::HashingFailed(_))
        ));
    }
}
