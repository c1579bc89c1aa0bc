//! Authentication handlers: registration, login and token validation.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, USER_ID_HEADER};
use crate::domain::{EducationLevel, Environment, Registration, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account username
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    #[schema(example = "alice1")]
    pub username: String,
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Account password
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    #[schema(example = "Abcdef12", min_length = 8, max_length = 128)]
    pub password: String,
    /// Must match `password` exactly
    #[schema(example = "Abcdef12")]
    pub confirm_password: String,
    /// Age in years
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    #[schema(example = 25)]
    pub age: i32,
    /// Learning environment
    pub environment: Environment,
    /// Education level
    pub education_level: EducationLevel,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Account password
    #[schema(example = "Abcdef12")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Create the token validation route (outside the strict auth limiter)
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/validate-token", get(validate_token))
}

/// Password composition and confirmation policy applied at the request
/// layer, before the domain value object runs its own checks.
fn validate_password_policy(password: &str, confirm_password: &str) -> AppResult<()> {
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_uppercase {
        return Err(AppError::validation(
            "Password must contain at least one uppercase letter",
        ));
    }
    if !has_lowercase {
        return Err(AppError::validation(
            "Password must contain at least one lowercase letter",
        ));
    }
    if !has_digit {
        return Err(AppError::validation(
            "Password must contain at least one digit",
        ));
    }
    if password != confirm_password {
        return Err(AppError::validation("Passwords do not match"));
    }

    Ok(())
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error or duplicate email/username")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_password_policy(&payload.password, &payload.confirm_password)?;

    let user = state
        .auth_service
        .register(Registration {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            age: payload.age,
            environment: payload.environment,
            education_level: payload.education_level,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::registered(&user))))
}

/// Login and get an access token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Validate a bearer token, echoing the subject in `X-User-Id`
#[utoipa::path(
    get,
    path = "/validate-token",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token is valid; X-User-Id carries the subject"),
        (status = 401, description = "Missing, malformed or expired token")
    )
)]
pub async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<([(&'static str, String); 1], Json<MessageResponse>)> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthenticated)?;

    let claims = state.auth_service.verify_token(token)?;

    Ok((
        [(USER_ID_HEADER, claims.sub.to_string())],
        Json(MessageResponse::new("Token is valid")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy_requires_all_classes() {
        assert!(validate_password_policy("Abcdef12", "Abcdef12").is_ok());
        assert!(validate_password_policy("abcdef12", "abcdef12").is_err());
        assert!(validate_password_policy("ABCDEF12", "ABCDEF12").is_err());
        assert!(validate_password_policy("Abcdefgh", "Abcdefgh").is_err());
    }

    #[test]
    fn password_policy_requires_matching_confirmation() {
        let result = validate_password_policy("Abcdef12", "Abcdef13");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
