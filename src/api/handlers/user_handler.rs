//! User handlers: read, update and delete of the caller's own account.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{ensure_self, CurrentUser};
use crate::api::AppState;
use crate::domain::{AccountUpdate, EducationLevel, Environment, UserDetailResponse};
use crate::errors::{AppError, AppResult};
use crate::types::NoContent;

/// Partial account update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New username
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    #[schema(example = "alice2")]
    pub username: Option<String>,
    /// New age (updates require an adult)
    #[validate(range(min = 18, message = "Age must be at least 18"))]
    #[schema(example = 26)]
    pub age: Option<i32>,
    /// New learning environment
    pub environment: Option<Environment>,
    /// New education level
    pub education_level: Option<EducationLevel>,
}

impl UpdateUserRequest {
    fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.age.is_none()
            && self.environment.is_none()
            && self.education_level.is_none()
    }
}

/// Create user routes (identity middleware is layered on by the router)
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Get own account detail
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID (must be the caller's own)")
    ),
    responses(
        (status = 200, description = "Account detail", body = UserDetailResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Acting on another identity"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserDetailResponse>> {
    // Ownership is checked before existence: foreign ids get 403 either way
    ensure_self(&current_user, id)?;

    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserDetailResponse::from(&user)))
}

/// Update own account
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID (must be the caller's own)")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account detail", body = UserDetailResponse),
        (status = 400, description = "Validation error or duplicate username"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Acting on another identity"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserDetailResponse>> {
    ensure_self(&current_user, id)?;

    if payload.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    let user = state
        .user_service
        .update_user(
            id,
            AccountUpdate {
                username: payload.username,
                age: payload.age,
                environment: payload.environment,
                education_level: payload.education_level,
            },
        )
        .await?;

    Ok(Json(UserDetailResponse::from(&user)))
}

/// Delete own account
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID (must be the caller's own)")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Acting on another identity"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    ensure_self(&current_user, id)?;

    state.user_service.delete_user(id).await?;
    Ok(NoContent)
}
