use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::StoredCredential;
use chrono::Utc;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Hashing and verification are CPU-bound and run on the blocking pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Credential hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Turn a plaintext password into the credential to persist.
    ///
    /// Runs before every write that carries a new password. A failure here
    /// aborts the write.
    async fn seal_password(&self, password: Password) -> Result<StoredCredential, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.as_str()))
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                UserError::from(e)
            })
    }

    /// Spend the cost of a password check when no account matched.
    async fn verify_decoy(&self, password: String) {
        let authenticator = Arc::clone(&self.authenticator);

        match tokio::task::spawn_blocking(move || authenticator.verify_decoy(&password)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Decoy verification failed"),
            Err(e) => tracing::warn!(error = %e, "Decoy verification task failed"),
        }
    }

    async fn ensure_email_available(&self, user: &User) -> Result<(), UserError> {
        match self.repository.find_by_email(&user.email).await? {
            Some(existing) if existing.id != user.id => {
                Err(UserError::EmailAlreadyExists(user.email.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let credential = self.seal_password(command.password).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            credential,
            role: command.role,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            role = %created_user.role,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            self.verify_decoy(command.password).await;
            tracing::info!(email = %command.email, reason = "unknown email", "Login rejected");
            return Err(UserError::InvalidCredentials);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let credential = user.credential.clone();
        let identity = user.identity();
        let password = command.password;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &credential, identity)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?;

        match result {
            Ok(outcome) => {
                tracing::info!(user_id = %user.id, "Login succeeded");
                Ok(Session {
                    access_token: outcome.access_token,
                    user,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user.id, reason = "wrong password", "Login rejected");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored credential could not be verified");
                Err(UserError::Credential(e))
            }
            Err(AuthenticationError::JwtError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Token issuance failed");
                Err(UserError::Token(e))
            }
        }
    }

    async fn get_profile(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_name) = command.name {
            user.name = new_name;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
            self.ensure_email_available(&user).await?;
        }

        if let Some(new_password) = command.password {
            user.credential = self.seal_password(new_password).await?;
        }

        user.updated_at = Utc::now();

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "Profile updated");

        Ok(updated_user)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
