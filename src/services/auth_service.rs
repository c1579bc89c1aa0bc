//! Authentication service - registration, login and token handling.
//!
//! Register and Login are the write-side orchestrators of the credential
//! pipeline: value-object validation, uniqueness preconditions, password
//! policy and hashing all run here, in that order.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::{CommonPasswords, Email, Password, Registration, User, Username};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "bearer")
    #[schema(example = "bearer")]
    pub token_type: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user account
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Login and return a signed access token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify an access token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate a signed token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::seconds(config.token_expire_minutes * SECONDS_PER_MINUTE);

    let claims = Claims {
        sub: user.user_id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
    })
}

/// Verify a token and extract claims (shared helper)
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::new(config.jwt_algorithm),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    repo: Arc<dyn UserRepository>,
    config: Config,
    common_passwords: Arc<CommonPasswords>,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        repo: Arc<dyn UserRepository>,
        config: Config,
        common_passwords: Arc<CommonPasswords>,
    ) -> Self {
        Self {
            repo,
            config,
            common_passwords,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        // Value objects first: normalized values drive the uniqueness lookups
        let email = Email::parse(&registration.email)?;
        let username = Username::parse(&registration.username)?;

        // Fast-path uniqueness checks. A concurrent registration can still
        // slip between these reads and the insert; the unique constraints in
        // the store settle that race.
        if self.repo.find_by_email(email.as_str()).await?.is_some() {
            return Err(AppError::duplicate("Email"));
        }
        if self
            .repo
            .find_by_username(username.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::duplicate("Username"));
        }

        // Password policy and hashing after the cheap checks
        let password = Password::from_plaintext(
            &registration.password,
            &self.common_passwords,
            self.config.bcrypt_cost,
        )?;

        let user = User::register(
            username,
            registration.age,
            email,
            password,
            registration.environment,
            registration.education_level,
        );

        self.repo.save(&user).await?;
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user_result = self.repo.find_by_email(&email).await?;

        // SECURITY: Perform password verification even if the user doesn't
        // exist, so unknown-email and wrong-password attempts take the same
        // time and return the same error.
        const DUMMY_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

        let (stored, user_exists) = match &user_result {
            Some(user) => (user.password.clone(), true),
            None => (Password::from_hash(DUMMY_HASH.to_string()), false),
        };

        let password_valid = stored.verify(&password);

        // Only succeed if both user exists AND password is valid
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since we verified user_exists is true
        generate_token(user_result.as_ref().unwrap(), &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
