//! User service - account read, update and delete use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AccountUpdate, User, Username};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get a user with their profile
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Apply a partial update to a user's details and profile
    async fn update_user(&self, id: Uuid, update: AccountUpdate) -> AppResult<User>;

    /// Delete a user and their profile
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using the repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_user(&self, id: Uuid, update: AccountUpdate) -> AppResult<User> {
        let mut user = self.repo.find_by_id(id).await?.ok_or_not_found()?;

        // Re-check username uniqueness when it actually changes
        if let Some(ref raw) = update.username {
            let candidate = Username::parse(raw)?;
            if candidate != user.username
                && self
                    .repo
                    .find_by_username(candidate.as_str())
                    .await?
                    .is_some()
            {
                return Err(AppError::duplicate("Username"));
            }
        }

        // The aggregate re-validates its own rules (adult age, username shape)
        user.update_details(update.username.as_deref(), update.age)?;
        user.update_profile(update.environment, update.education_level);

        self.repo.update(&user).await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        // Existence check first so unknown ids surface as 404
        self.repo.find_by_id(id).await?.ok_or_not_found()?;
        self.repo.delete(id).await
    }
}
