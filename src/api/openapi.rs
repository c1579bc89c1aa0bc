//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, user_handler};
use crate::domain::{
    EducationLevel, Environment, ProfileResponse, Role, UserDetailResponse, UserResponse,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the authentication and account API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth API",
        version = "0.1.0",
        description = "Authentication and user-account microservice",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::validate_token,
        // User endpoints
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            // Domain types
            Role,
            Environment,
            EducationLevel,
            UserResponse,
            UserDetailResponse,
            ProfileResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // User handler types
            user_handler::UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration, login and token validation"),
        (name = "Users", description = "Self-service account operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /login"))
                        .build(),
                ),
            );
        }
    }
}
