use std::env;

use auth::HashingPolicy;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Browser origin allowed by CORS. Any origin when unset.
    #[serde(default)]
    pub client_url: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    /// Signing secret for bearer tokens. Startup fails when blank.
    #[serde(default)]
    pub jwt_secret: String,
    /// Restrict hashing to PBKDF2-HMAC-SHA256.
    #[serde(default)]
    pub regulated_mode: bool,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"****")
            .field("regulated_mode", &self.regulated_mode)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AuthConfig {
    /// Hashing policy derived from the configured flags.
    pub fn hashing_policy(&self) -> HashingPolicy {
        HashingPolicy::new()
            .regulated(self.regulated_mode)
            .with_bcrypt_cost(self.bcrypt_cost)
    }
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__JWT_SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__REGULATED_MODE=true overrides auth.regulated_mode
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config(regulated_mode: bool, bcrypt_cost: u32) -> AuthConfig {
        AuthConfig {
            jwt_secret: "top-secret".to_string(),
            regulated_mode,
            bcrypt_cost,
        }
    }

    #[test]
    fn test_hashing_policy_from_flags() {
        let policy = auth_config(false, 12).hashing_policy();
        assert!(!policy.is_regulated());
        assert_eq!(policy.bcrypt_cost(), 12);

        let policy = auth_config(true, 10).hashing_policy();
        assert!(policy.is_regulated());
    }

    #[test]
    fn test_defaults() {
        let configuration = ConfigBuilder::builder()
            .set_override("server.http_port", 8080)
            .unwrap()
            .set_override("database.backend", "memory")
            .unwrap()
            .set_override("auth.jwt_secret", "top-secret")
            .unwrap()
            .build()
            .unwrap();

        let config: Config = configuration.try_deserialize().unwrap();
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.auth.regulated_mode);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert_eq!(config.server.client_url, None);
    }

    #[test]
    fn test_secret_is_not_printed() {
        let printed = format!("{:?}", auth_config(false, 10));
        assert!(!printed.contains("top-secret"));
    }
}
