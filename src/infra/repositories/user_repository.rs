//! User repository implementation.
//!
//! Persists the User aggregate (user row + owned profile row) and maps
//! database models back into domain entities. All multi-row writes run in
//! a single transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{profile, user};
use crate::domain::{
    EducationLevel, Email, Environment, Password, Profile, Role, User, Username,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user (with profile) by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user (with profile) by exact email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user (with profile) by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Persist a newly registered aggregate (user + profile, one transaction)
    async fn save(&self, user: &User) -> AppResult<()>;

    /// Persist changes to an existing aggregate
    async fn update(&self, user: &User) -> AppResult<()>;

    /// Delete a user by ID; the profile row is removed by the cascade
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository backed by SeaORM.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .find_also_related(profile::Entity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .find_also_related(profile::Entity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(to_domain).transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .find_also_related(profile::Entity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(to_domain).transpose()
    }

    async fn save(&self, new_user: &User) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let user_model = user::ActiveModel {
            user_id: Set(new_user.user_id),
            username: Set(new_user.username.as_str().to_string()),
            email: Set(new_user.email.as_str().to_string()),
            password_hash: Set(new_user.password.hash().to_string()),
            age: Set(new_user.age),
            created_at: Set(new_user.created_at),
        };
        user_model.insert(&txn).await.map_err(map_write_err)?;

        let profile_model = profile::ActiveModel {
            profile_id: Set(new_user.profile.profile_id),
            user_id: Set(new_user.profile.user_id),
            role: Set(new_user.profile.role.as_str().to_string()),
            environment: Set(new_user.profile.environment.as_str().to_string()),
            education_level: Set(new_user.profile.education_level.as_str().to_string()),
        };
        profile_model.insert(&txn).await.map_err(map_write_err)?;

        txn.commit().await.map_err(AppError::from)
    }

    async fn update(&self, changed: &User) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let user_model = user::ActiveModel {
            user_id: Set(changed.user_id),
            username: Set(changed.username.as_str().to_string()),
            age: Set(changed.age),
            ..Default::default()
        };
        user_model.update(&txn).await.map_err(map_write_err)?;

        let profile_model = profile::ActiveModel {
            profile_id: Set(changed.profile.profile_id),
            environment: Set(changed.profile.environment.as_str().to_string()),
            education_level: Set(changed.profile.education_level.as_str().to_string()),
            ..Default::default()
        };
        profile_model.update(&txn).await.map_err(map_write_err)?;

        txn.commit().await.map_err(AppError::from)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Map a write failure, surfacing unique-constraint violations as the
/// duplicate error. The database constraint is the authoritative guard
/// against registration races.
fn map_write_err(e: DbErr) -> AppError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        return if msg.contains("email") {
            AppError::duplicate("Email")
        } else if msg.contains("username") {
            AppError::duplicate("Username")
        } else {
            AppError::duplicate("Account")
        };
    }
    if matches!(e, DbErr::RecordNotUpdated) {
        return AppError::NotFound;
    }
    AppError::from(e)
}

/// Rebuild the domain aggregate from its stored rows.
///
/// The password comes back through the hash-only construction path;
/// the plaintext-derived fields are gone for good.
fn to_domain((user_row, profile_row): (user::Model, Option<profile::Model>)) -> AppResult<User> {
    let profile_row = profile_row
        .ok_or_else(|| AppError::internal(format!("User {} has no profile row", user_row.user_id)))?;

    let profile = Profile {
        profile_id: profile_row.profile_id,
        user_id: profile_row.user_id,
        role: Role::try_from(profile_row.role.as_str()).map_err(AppError::internal)?,
        environment: Environment::try_from(profile_row.environment.as_str())
            .map_err(AppError::internal)?,
        education_level: EducationLevel::try_from(profile_row.education_level.as_str())
            .map_err(AppError::internal)?,
    };

    Ok(User {
        user_id: user_row.user_id,
        username: Username::parse(&user_row.username)
            .map_err(|e| AppError::internal(format!("Stored username invalid: {e}")))?,
        age: user_row.age,
        email: Email::parse(&user_row.email)
            .map_err(|e| AppError::internal(format!("Stored email invalid: {e}")))?,
        password: Password::from_hash(user_row.password_hash),
        profile,
        created_at: user_row.created_at,
    })
}
