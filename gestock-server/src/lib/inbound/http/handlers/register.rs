use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::DisplayNameError;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordError;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::CREATED,
                MessageData::new("User registered successfully"),
            )
        })
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),

    #[error("Invalid role: {0}")]
    Role(#[from] auth::identity::UnknownRole),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let name = DisplayName::new(self.name)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let role = self
            .role
            .map(|role| role.parse::<auth::Role>())
            .transpose()?
            .unwrap_or_default();
        Ok(RegisterCommand::new(name, email, password, role))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use auth::Role;

    use super::*;

    fn request(name: &str, email: &str, password: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_role_defaults_to_user() {
        let command = request("Ana Lopez", "ana@example.com", "abc123", None)
            .try_into_command()
            .unwrap();
        assert_eq!(command.role, Role::User);

        let command = request("Ana Lopez", "ana@example.com", "abc123", Some("admin"))
            .try_into_command()
            .unwrap();
        assert_eq!(command.role, Role::Admin);
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let cases = [
            request("An", "ana@example.com", "abc123", None),
            request("Ana Lopez", "ana.example.com", "abc123", None),
            request("Ana Lopez", "ana@example.com", "abc12", None),
            request("Ana Lopez", "ana@example.com", "abc123", Some("root")),
        ];

        for case in cases {
            assert!(case.try_into_command().is_err());
        }
    }
}
