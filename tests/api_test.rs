//! API layer tests.
//!
//! These tests cover the HTTP-facing contracts without requiring database
//! or Redis connections: error-to-status mapping, request/response wire
//! formats and the self-only enforcement rule, plus mock-backed service
//! trait round trips.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use auth_api::api::middleware::{ensure_self, CurrentUser};
use auth_api::domain::{
    AccountUpdate, CommonPasswords, EducationLevel, Email, Environment, Password, Registration,
    User, UserDetailResponse, UserResponse, Username,
};
use auth_api::errors::{AppError, AppResult};
use auth_api::services::{AuthService, Claims, TokenResponse, UserService};

// =============================================================================
// Test Helpers
// =============================================================================

fn sample_user() -> User {
    User::register(
        Username::parse("alice1").unwrap(),
        25,
        Email::parse("a@b.co").unwrap(),
        Password::from_plaintext("Abcdef12", &CommonPasswords::default(), 4).unwrap(),
        Environment::Casa,
        EducationLevel::Licenciatura,
    )
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn error_status_codes_follow_the_taxonomy() {
    let cases = [
        (AppError::validation("bad input"), StatusCode::BAD_REQUEST),
        (AppError::duplicate("Email"), StatusCode::BAD_REQUEST),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
        (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
        (AppError::Forbidden, StatusCode::FORBIDDEN),
        (AppError::NotFound, StatusCode::NOT_FOUND),
        (
            AppError::internal("boom"),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        let response = error.into_response();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn internal_errors_hide_details_from_clients() {
    let response = AppError::internal("connection string leaked").into_response();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(!text.contains("connection string leaked"));
    assert!(text.contains("An internal error occurred"));
}

// =============================================================================
// Self-Only Enforcement
// =============================================================================

#[tokio::test]
async fn foreign_identity_is_forbidden_regardless_of_existence() {
    let caller = CurrentUser { id: Uuid::new_v4() };

    // The check never consults the repository: any foreign id is rejected
    let unknown_target = Uuid::new_v4();
    assert!(matches!(
        ensure_self(&caller, unknown_target),
        Err(AppError::Forbidden)
    ));
    assert!(ensure_self(&caller, caller.id).is_ok());
}

// =============================================================================
// Wire Formats
// =============================================================================

#[test]
fn register_request_accepts_the_documented_example() {
    use auth_api::api::handlers::auth_handler::RegisterRequest;

    let payload: RegisterRequest = serde_json::from_str(
        r#"{
            "username": "alice1",
            "email": "a@b.co",
            "password": "Abcdef12",
            "confirmPassword": "Abcdef12",
            "age": 25,
            "environment": "casa",
            "educationLevel": "licenciatura"
        }"#,
    )
    .unwrap();

    assert!(payload.validate().is_ok());
    assert_eq!(payload.username, "alice1");
    assert_eq!(payload.environment, Environment::Casa);
    assert_eq!(payload.education_level, EducationLevel::Licenciatura);
}

#[test]
fn register_request_validation_bounds() {
    use auth_api::api::handlers::auth_handler::RegisterRequest;

    let mut base = serde_json::json!({
        "username": "alice1",
        "email": "a@b.co",
        "password": "Abcdef12",
        "confirmPassword": "Abcdef12",
        "age": 25,
        "environment": "casa",
        "educationLevel": "licenciatura"
    });

    // Registration tolerates minors down to age 1
    base["age"] = serde_json::json!(1);
    let payload: RegisterRequest = serde_json::from_value(base.clone()).unwrap();
    assert!(payload.validate().is_ok());

    base["age"] = serde_json::json!(0);
    let payload: RegisterRequest = serde_json::from_value(base.clone()).unwrap();
    assert!(payload.validate().is_err());

    base["age"] = serde_json::json!(25);
    base["password"] = serde_json::json!("Abc1");
    base["confirmPassword"] = serde_json::json!("Abc1");
    let payload: RegisterRequest = serde_json::from_value(base).unwrap();
    assert!(payload.validate().is_err());
}

#[test]
fn unknown_enum_values_fail_deserialization() {
    use auth_api::api::handlers::auth_handler::RegisterRequest;

    let result = serde_json::from_str::<RegisterRequest>(
        r#"{
            "username": "alice1",
            "email": "a@b.co",
            "password": "Abcdef12",
            "confirmPassword": "Abcdef12",
            "age": 25,
            "environment": "office",
            "educationLevel": "licenciatura"
        }"#,
    );
    assert!(result.is_err());
}

#[test]
fn update_request_is_camel_cased() {
    use auth_api::api::handlers::user_handler::UpdateUserRequest;

    let payload: UpdateUserRequest = serde_json::from_str(
        r#"{"educationLevel": "maestria", "age": 30}"#,
    )
    .unwrap();

    assert!(payload.validate().is_ok());
    assert_eq!(payload.education_level, Some(EducationLevel::Maestria));
    assert_eq!(payload.age, Some(30));
    assert_eq!(payload.username, None);
}

#[test]
fn register_response_exposes_no_secrets() {
    let user = sample_user();
    let response = UserResponse::registered(&user);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["username"], "alice1");
    assert_eq!(json["email"], "a@b.co");
    assert!(json.get("userId").is_some());
    // No hash, no strength metrics
    assert!(json.get("password").is_none());
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("entropyBits").is_none());
}

#[test]
fn detail_response_uses_wire_enum_values() {
    let user = sample_user();
    let detail = UserDetailResponse::from(&user);
    let json = serde_json::to_value(&detail).unwrap();

    assert_eq!(json["profile"]["role"], "alumno");
    assert_eq!(json["profile"]["environment"], "casa");
    assert_eq!(json["profile"]["educationLevel"], "licenciatura");
    assert_eq!(json["age"], 25);
}

#[test]
fn token_response_is_camel_cased() {
    let token = TokenResponse {
        access_token: "abc".to_string(),
        token_type: "bearer".to_string(),
    };
    let json = serde_json::to_value(&token).unwrap();
    assert_eq!(json["accessToken"], "abc");
    assert_eq!(json["tokenType"], "bearer");
}

// =============================================================================
// Mock Services
// =============================================================================

/// Mock auth service that returns predefined responses
struct MockAuthService;

#[async_trait]
impl AuthService for MockAuthService {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        Ok(User::register(
            Username::parse(&registration.username).map_err(AppError::from)?,
            registration.age,
            Email::parse(&registration.email).map_err(AppError::from)?,
            Password::from_hash("hashed".to_string()),
            registration.environment,
            registration.education_level,
        ))
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<TokenResponse> {
        Ok(TokenResponse {
            access_token: "mock-token".to_string(),
            token_type: "bearer".to_string(),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        if token == "valid-test-token" {
            Ok(Claims {
                sub: Uuid::new_v4(),
                exp: Utc::now().timestamp() + 3600,
                iat: Utc::now().timestamp(),
            })
        } else {
            Err(AppError::InvalidToken)
        }
    }
}

/// Mock user service for testing
struct MockUserService;

#[async_trait]
impl UserService for MockUserService {
    async fn get_user(&self, _id: Uuid) -> AppResult<User> {
        Ok(sample_user())
    }

    async fn update_user(&self, _id: Uuid, update: AccountUpdate) -> AppResult<User> {
        let mut user = sample_user();
        user.update_details(update.username.as_deref(), update.age)
            .map_err(AppError::from)?;
        user.update_profile(update.environment, update.education_level);
        Ok(user)
    }

    async fn delete_user(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn mock_auth_service_round_trips() {
    let service = MockAuthService;

    let user = service
        .register(Registration {
            username: "newbie".to_string(),
            email: "new@example.com".to_string(),
            password: "Abcdef12".to_string(),
            age: 30,
            environment: Environment::Universidad,
            education_level: EducationLevel::Doctorado,
        })
        .await
        .unwrap();
    assert_eq!(user.email.as_str(), "new@example.com");

    let token = service
        .login("new@example.com".to_string(), "Abcdef12".to_string())
        .await
        .unwrap();
    assert_eq!(token.token_type, "bearer");

    assert!(service.verify_token("valid-test-token").is_ok());
    assert!(matches!(
        service.verify_token("bad"),
        Err(AppError::InvalidToken)
    ));
}

#[tokio::test]
async fn mock_user_service_applies_updates() {
    let service = MockUserService;

    let user = service
        .update_user(
            Uuid::new_v4(),
            AccountUpdate {
                environment: Some(Environment::Preparatoria),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(user.profile.environment, Environment::Preparatoria);
}
