//! Application settings loaded from environment variables.

use std::env;

use jsonwebtoken::Algorithm;

use super::constants::{
    DEFAULT_BCRYPT_COST, DEFAULT_COMMON_PASSWORDS_PATH, DEFAULT_DATABASE_URL,
    DEFAULT_JWT_ALGORITHM, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_TOKEN_EXPIRE_MINUTES, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_expire_minutes: i64,
    pub bcrypt_cost: u32,
    pub common_passwords_path: String,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_expire_minutes", &self.token_expire_minutes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("common_passwords_path", &self.common_passwords_path)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set in production or is too short
    /// (security requirement), or if JWT_ALGORITHM names an unknown
    /// algorithm.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                // Production mode: panic
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        // Validate JWT secret length
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let jwt_algorithm = env::var("JWT_ALGORITHM")
            .unwrap_or_else(|_| DEFAULT_JWT_ALGORITHM.to_string())
            .parse::<Algorithm>()
            .unwrap_or_else(|_| panic!("JWT_ALGORITHM names an unsupported algorithm"));

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_algorithm,
            token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_EXPIRE_MINUTES),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BCRYPT_COST),
            common_passwords_path: env::var("COMMON_PASSWORDS_PATH")
                .unwrap_or_else(|_| DEFAULT_COMMON_PASSWORDS_PATH.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    /// Build a configuration programmatically with defaults for everything
    /// except the signing secret. Used by embedding code and tests.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        let jwt_secret = jwt_secret.into();
        assert!(
            jwt_secret.len() >= MIN_JWT_SECRET_LENGTH,
            "JWT secret must be at least {} characters long",
            MIN_JWT_SECRET_LENGTH
        );

        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret,
            jwt_algorithm: Algorithm::HS256,
            token_expire_minutes: DEFAULT_TOKEN_EXPIRE_MINUTES,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            common_passwords_path: DEFAULT_COMMON_PASSWORDS_PATH.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
