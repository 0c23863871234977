use std::fmt;
use std::str::FromStr;

use auth::Role;
use auth::StoredCredential;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::DisplayNameError;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered account. The credential is only ever the output
/// of the password hasher, never a plaintext password.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub credential: StoredCredential,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Identity the token service vouches for after a successful login.
    pub fn identity(&self) -> auth::Identity {
        auth::Identity::new(self.id, self.role)
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Surrounding whitespace is dropped; the rest must be 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid display name.
    ///
    /// # Errors
    /// * `TooShort` - Name shorter than 3 characters
    /// * `TooLong` - Name longer than 50 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length < Self::MIN_LENGTH {
            Err(DisplayNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser and stores it
/// lowercased, so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for a new credential.
///
/// Lives only until it is handed to the hasher. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Password shorter than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: Password,
    pub role: Role,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `name` - Validated display name
    /// * `email` - Validated email address
    /// * `password` - Plaintext password (will be hashed by service)
    /// * `role` - Requested role
    pub fn new(name: DisplayName, email: EmailAddress, password: Password, role: Role) -> Self {
        Self {
            name,
            email,
            password,
            role,
        }
    }
}

/// Login attempt.
///
/// The password is not validated against the registration rules: a wrong
/// password of any shape is just a wrong password.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Command to update the caller's own profile.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub name: Option<DisplayName>,
    pub email: Option<EmailAddress>,
    pub password: Option<Password>,
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_bounds() {
        assert!(DisplayName::new("ab".to_string()).is_err());
        assert!(DisplayName::new("  ab  ".to_string()).is_err());
        assert_eq!(DisplayName::new(" abc ".to_string()).unwrap().as_str(), "abc");
        assert!(DisplayName::new("a".repeat(50)).is_ok());
        assert_eq!(
            DisplayName::new("a".repeat(51)),
            Err(DisplayNameError::TooLong {
                max: 50,
                actual: 51
            })
        );
    }

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new(" Ana.Lopez@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "ana.lopez@example.com");

        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert_eq!(
            Password::new("abc12".to_string()),
            Err(PasswordError::TooShort { min: 6, actual: 5 })
        );
        assert!(Password::new("abc123".to_string()).is_ok());
    }

    #[test]
    fn test_password_is_not_printed() {
        let password = Password::new("hunter22".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter22"));

        let login = LoginCommand {
            email: EmailAddress::new("a@example.com".to_string()).unwrap(),
            password: "hunter22".to_string(),
        };
        assert!(!format!("{:?}", login).contains("hunter22"));
    }

    #[test]
    fn test_user_identity() {
        let id = UserId::new();
        let user = User {
            id,
            name: DisplayName::new("Ana".to_string()).unwrap(),
            email: EmailAddress::new("ana@example.com".to_string()).unwrap(),
            credential: StoredCredential::new("$2b$04$x", None),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let identity = user.identity();
        assert_eq!(identity.id, id.to_string());
        assert!(identity.is_admin());
    }
}
