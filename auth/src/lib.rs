//! Credential and authentication core
//!
//! Provides the building blocks behind account login:
//! - Password hashing with an Argon2id -> scrypt -> bcrypt fallback chain
//! - A regulated mode restricted to PBKDF2-HMAC-SHA256
//! - Verification of stored credentials in any of those formats
//! - HS256 bearer tokens carrying a user id and role
//! - An access guard with an administrator role
//!
//! Nothing here knows about HTTP or storage. Services persist a
//! [`StoredCredential`] and hand request headers to the [`guard`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{CredentialRecord, HashingPolicy, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashingPolicy::new().with_argon2_params(1024, 1, 1));
//! let record = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &record).unwrap());
//!
//! // Round trip through the storage form
//! let stored = record.to_stored();
//! let parsed = CredentialRecord::parse(&stored).unwrap();
//! assert!(!hasher.verify("not_my_password", &parsed).unwrap());
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Identity, JwtHandler, Role, SigningSecret};
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let handler = JwtHandler::new(&secret);
//! let token = handler.issue(&Identity::new("user123", Role::User)).unwrap();
//! let identity = handler.verify(&token).unwrap();
//! assert_eq!(identity.id, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, HashingPolicy, Identity, Role};
//!
//! let policy = HashingPolicy::new().with_argon2_params(1024, 1, 1);
//! let auth = Authenticator::from_config("secret_key_at_least_32_bytes_long!", policy).unwrap();
//!
//! // Register: hash password
//! let stored = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let identity = Identity::new("user123", Role::Admin);
//! let result = auth.authenticate("password123", &stored, identity).unwrap();
//!
//! // Guard: admit the bearer as an administrator
//! let header = format!("Bearer {}", result.access_token);
//! let admin = auth.authorize_admin(None, Some(&header)).unwrap();
//! assert!(admin.is_admin());
//! ```

pub mod authenticator;
pub mod guard;
pub mod identity;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use guard::AccessError;
pub use identity::Identity;
pub use identity::Role;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SigningSecret;
pub use password::Algorithm;
pub use password::CredentialRecord;
pub use password::HashingPolicy;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::StoredCredential;
