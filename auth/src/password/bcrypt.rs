use super::errors::PasswordError;
use super::policy::HashingPolicy;
use super::record::CredentialRecord;

pub(super) fn hash(password: &str, policy: &HashingPolicy) -> Result<CredentialRecord, PasswordError> {
    bcrypt::hash(password, policy.bcrypt_cost)
        .map(|hash| CredentialRecord::Bcrypt { hash })
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

pub(super) fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash)
        .map_err(|e| PasswordError::MalformedRecord(format!("Invalid bcrypt hash: {}", e)))
}
