use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-process implementation of UserRepository.
///
/// Enforces the same unique-email rule as the users table. Contents are
/// lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken(users: &HashMap<UserId, User>, user: &User) -> bool {
        users
            .values()
            .any(|existing| existing.email == user.email && existing.id != user.id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if Self::email_taken(&users, &user) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if Self::email_taken(&users, &user) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use auth::Role;
    use auth::StoredCredential;
    use chrono::Duration;
    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::DisplayName;

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            name: DisplayName::new("Ana Lopez".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            credential: StoredCredential::new("$2b$04$placeholder", None),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryUserRepository::new();
        let created = repository.create(user("ana@example.com")).await.unwrap();

        let by_id = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email.as_str(), "ana@example.com");

        let email = EmailAddress::new("ANA@example.com".to_string()).unwrap();
        let by_email = repository.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("ana@example.com")).await.unwrap();

        let result = repository.create(user("ana@example.com")).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_to_taken_email_rejected() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("ana@example.com")).await.unwrap();
        let mut other = repository.create(user("luis@example.com")).await.unwrap();

        other.email = EmailAddress::new("ana@example.com".to_string()).unwrap();
        let result = repository.update(other).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repository = InMemoryUserRepository::new();
        let mut older = user("old@example.com");
        older.created_at = Utc::now() - Duration::days(1);
        repository.create(older).await.unwrap();
        repository.create(user("new@example.com")).await.unwrap();

        let users = repository.list_all().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email.as_str(), "new@example.com");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let repository = InMemoryUserRepository::new();

        let result = repository.update(user("ghost@example.com")).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));

        let result = repository.delete(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
