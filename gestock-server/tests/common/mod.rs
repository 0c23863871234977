use std::sync::Arc;

use auth::Algorithm;
use auth::Authenticator;
use auth::HashingPolicy;
use auth::JwtHandler;
use auth::Role;
use auth::SigningSecret;
use chrono::Utc;
use gestock_server::domain::user::models::DisplayName;
use gestock_server::domain::user::models::EmailAddress;
use gestock_server::domain::user::models::User;
use gestock_server::domain::user::models::UserId;
use gestock_server::domain::user::ports::UserRepository;
use gestock_server::domain::user::service::UserService;
use gestock_server::inbound::http::router::create_router;
use gestock_server::outbound::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Cheap cost parameters so tests do not spend seconds per hash.
pub fn fast_policy() -> HashingPolicy {
    HashingPolicy::new()
        .with_argon2_params(1024, 1, 1)
        .with_scrypt_log_n(10)
        .with_bcrypt_cost(4)
        .with_pbkdf2_iterations(1_000)
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(fast_policy()).await
    }

    pub async fn spawn_with_policy(policy: HashingPolicy) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());

        let authenticator = Arc::new(
            Authenticator::from_config(JWT_SECRET, policy).expect("Failed to build authenticator"),
        );

        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(user_service, authenticator, None);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let jwt_handler = JwtHandler::new(&SigningSecret::new(JWT_SECRET).unwrap());

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account through the API.
    pub async fn register(&self, name: &str, email: &str, password: &str, role: Option<&str>) -> reqwest::Response {
        let mut body = json!({
            "name": name,
            "email": email,
            "password": password,
        });
        if let Some(role) = role {
            body["role"] = json!(role);
        }

        self.post("/api/auth/register")
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in through the API.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the bearer token.
    pub async fn register_and_login(&self, email: &str, role: Option<&str>) -> String {
        let response = self.register("Test User", email, "abc123", role).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = self
            .login(email, "abc123")
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["token"]
            .as_str()
            .expect("Login did not return a token")
            .to_string()
    }

    /// Insert an account whose credential was produced under another policy.
    pub async fn seed_legacy_user(&self, email: &str, password: &str, algorithm: Algorithm) -> User {
        let legacy = Authenticator::from_config(
            JWT_SECRET,
            fast_policy().with_preference(vec![algorithm]),
        )
        .unwrap();

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: DisplayName::new("Legacy User".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            credential: legacy.hash_password(password).unwrap(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(user).await.unwrap()
    }
}
