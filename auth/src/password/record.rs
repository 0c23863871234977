use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use super::errors::PasswordError;

const ARGON2_MARKER: &str = "$argon2";
const BCRYPT_MARKER: &str = "$2";
const SCRYPT_SEPARATOR: char = ':';

/// Password hashing algorithm that produced a credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Argon2id,
    Scrypt,
    Bcrypt,
    Pbkdf2,
}

impl Algorithm {
    /// Get the algorithm tag as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Argon2id => "argon2id",
            Algorithm::Scrypt => "scrypt",
            Algorithm::Bcrypt => "bcrypt",
            Algorithm::Pbkdf2 => "pbkdf2",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential as it is persisted on the user entity.
///
/// `hash` holds the self-describing encoding. `salt` is only set for PBKDF2
/// records, whose salt lives in its own column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub hash: String,
    pub salt: Option<String>,
}

impl StoredCredential {
    pub fn new(hash: impl Into<String>, salt: Option<String>) -> Self {
        Self {
            hash: hash.into(),
            salt,
        }
    }
}

/// Parsed password credential.
///
/// Produced by [`CredentialRecord::parse`] at the storage boundary so that
/// verification dispatches on the variant instead of on string content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialRecord {
    /// PHC string, `$argon2id$v=19$m=...,t=...,p=...$salt$hash`
    Argon2id { hash: String },
    /// Raw salt and derived key, stored as `<saltHex>:<keyHex>`
    Scrypt { salt: Vec<u8>, key: Vec<u8> },
    /// Modular crypt string, `$2b$<cost>$<salt+hash>`
    Bcrypt { hash: String },
    /// Raw salt and derived key, stored as two hex columns
    Pbkdf2 { salt: Vec<u8>, key: Vec<u8> },
}

impl CredentialRecord {
    /// Parse a stored credential into its algorithm variant.
    ///
    /// # Arguments
    /// * `stored` - Persisted hash and optional salt columns
    ///
    /// # Returns
    /// The credential variant the stored text encodes
    ///
    /// # Errors
    /// * `MalformedRecord` - The text matches no known encoding, or a hex
    ///   segment is empty or not valid hex
    pub fn parse(stored: &StoredCredential) -> Result<Self, PasswordError> {
        if let Some(salt) = &stored.salt {
            return Ok(Self::Pbkdf2 {
                salt: decode_segment("pbkdf2 salt", salt)?,
                key: decode_segment("pbkdf2 key", &stored.hash)?,
            });
        }

        let hash = stored.hash.as_str();
        if hash.starts_with(ARGON2_MARKER) {
            Ok(Self::Argon2id {
                hash: hash.to_string(),
            })
        } else if let Some((salt, key)) = hash.split_once(SCRYPT_SEPARATOR) {
            Ok(Self::Scrypt {
                salt: decode_segment("scrypt salt", salt)?,
                key: decode_segment("scrypt key", key)?,
            })
        } else if hash.starts_with(BCRYPT_MARKER) {
            Ok(Self::Bcrypt {
                hash: hash.to_string(),
            })
        } else {
            Err(PasswordError::MalformedRecord(
                "unrecognized credential encoding".to_string(),
            ))
        }
    }

    /// Encode the record into its persisted columns.
    pub fn to_stored(&self) -> StoredCredential {
        match self {
            CredentialRecord::Argon2id { hash } | CredentialRecord::Bcrypt { hash } => {
                StoredCredential::new(hash.clone(), None)
            }
            CredentialRecord::Scrypt { salt, key } => StoredCredential::new(
                format!("{}{}{}", hex::encode(salt), SCRYPT_SEPARATOR, hex::encode(key)),
                None,
            ),
            CredentialRecord::Pbkdf2 { salt, key } => {
                StoredCredential::new(hex::encode(key), Some(hex::encode(salt)))
            }
        }
    }

    /// Algorithm that produced this record.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            CredentialRecord::Argon2id { .. } => Algorithm::Argon2id,
            CredentialRecord::Scrypt { .. } => Algorithm::Scrypt,
            CredentialRecord::Bcrypt { .. } => Algorithm::Bcrypt,
            CredentialRecord::Pbkdf2 { .. } => Algorithm::Pbkdf2,
        }
    }
}

impl TryFrom<&StoredCredential> for CredentialRecord {
    type Error = PasswordError;

    fn try_from(stored: &StoredCredential) -> Result<Self, Self::Error> {
        Self::parse(stored)
    }
}

impl From<&CredentialRecord> for StoredCredential {
    fn from(record: &CredentialRecord) -> Self {
        record.to_stored()
    }
}

fn decode_segment(label: &str, segment: &str) -> Result<Vec<u8>, PasswordError> {
    if segment.is_empty() {
        return Err(PasswordError::MalformedRecord(format!("empty {}", label)));
    }

    hex::decode(segment)
        .map_err(|e| PasswordError::MalformedRecord(format!("invalid {}: {}", label, e)))
}
