//! User aggregate root.
//!
//! Combines the validated value objects and the owned Profile into one
//! consistency boundary. Mutation goes through `update_details` and
//! `update_profile`, which re-check the business rules regardless of what
//! the request layer already validated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::email::Email;
use super::password::Password;
use super::profile::{EducationLevel, Environment, Profile, Role};
use super::username::{Username, UsernameError};
use crate::config::MIN_ADULT_AGE;

/// Aggregate-level rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error(transparent)]
    Username(#[from] UsernameError),

    #[error("User must be at least {MIN_ADULT_AGE} years old")]
    UnderAge,
}

/// User aggregate root. Owns its Profile (1:1, cascade-deleted).
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub username: Username,
    pub age: i32,
    pub email: Email,
    pub password: Password,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a new aggregate from validated parts.
    pub fn register(
        username: Username,
        age: i32,
        email: Email,
        password: Password,
        environment: Environment,
        education_level: EducationLevel,
    ) -> Self {
        let user_id = Uuid::new_v4();
        Self {
            user_id,
            username,
            age,
            email,
            password,
            profile: Profile::new(user_id, environment, education_level),
            created_at: Utc::now(),
        }
    }

    /// Update basic account details.
    ///
    /// The username is re-validated in full here; the age rule is stricter
    /// than at registration (updates require an adult).
    pub fn update_details(
        &mut self,
        username: Option<&str>,
        age: Option<i32>,
    ) -> Result<(), UserError> {
        if let Some(raw) = username {
            self.username = Username::parse(raw)?;
        }
        if let Some(age) = age {
            if age < MIN_ADULT_AGE {
                return Err(UserError::UnderAge);
            }
            self.age = age;
        }
        Ok(())
    }

    /// Update the owned profile's environment and education level.
    pub fn update_profile(
        &mut self,
        environment: Option<Environment>,
        education_level: Option<EducationLevel>,
    ) {
        if let Some(environment) = environment {
            self.profile.environment = environment;
        }
        if let Some(education_level) = education_level {
            self.profile.education_level = education_level;
        }
    }
}

/// Raw registration input handed to the Register use case.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub age: i32,
    pub environment: Environment,
    pub education_level: EducationLevel,
}

/// Partial update input handed to the Update use case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    pub username: Option<String>,
    pub age: Option<i32>,
    pub environment: Option<Environment>,
    pub education_level: Option<EducationLevel>,
}

/// Registration response (public-safe: no hash, no strength details).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    /// Account username
    #[schema(example = "alice1")]
    pub username: String,
    /// Account email address
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Human-readable status message
    pub message: String,
}

impl UserResponse {
    pub fn registered(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            message: "User registered successfully".to_string(),
        }
    }
}

/// Profile section of the detail response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub role: Role,
    pub environment: Environment,
    pub education_level: EducationLevel,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            role: profile.role,
            environment: profile.environment,
            education_level: profile.education_level,
        }
    }
}

/// Full account detail returned to the owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub age: i32,
    pub profile: ProfileResponse,
}

impl From<&User> for UserDetailResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            age: user.age,
            profile: ProfileResponse::from(&user.profile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommonPasswords;

    fn sample_user() -> User {
        User::register(
            Username::parse("alice1").unwrap(),
            25,
            Email::parse("alice@example.com").unwrap(),
            Password::from_plaintext("Abcdef12", &CommonPasswords::default(), 4).unwrap(),
            Environment::Casa,
            EducationLevel::Licenciatura,
        )
    }

    #[test]
    fn register_links_profile_to_user() {
        let user = sample_user();
        assert_eq!(user.profile.user_id, user.user_id);
        assert_eq!(user.profile.role, Role::Student);
    }

    #[test]
    fn update_details_accepts_valid_changes() {
        let mut user = sample_user();
        user.update_details(Some("bob-2"), Some(30)).unwrap();
        assert_eq!(user.username.as_str(), "bob-2");
        assert_eq!(user.age, 30);
    }

    #[test]
    fn update_details_rejects_minors() {
        let mut user = sample_user();
        assert_eq!(
            user.update_details(None, Some(17)),
            Err(UserError::UnderAge)
        );
        assert_eq!(user.age, 25);
    }

    #[test]
    fn update_details_revalidates_username() {
        let mut user = sample_user();
        let err = user.update_details(Some("ab"), None).unwrap_err();
        assert_eq!(err, UserError::Username(UsernameError::TooShort));
        assert_eq!(user.username.as_str(), "alice1");
    }

    #[test]
    fn update_profile_changes_only_provided_fields() {
        let mut user = sample_user();
        user.update_profile(Some(Environment::Universidad), None);
        assert_eq!(user.profile.environment, Environment::Universidad);
        assert_eq!(user.profile.education_level, EducationLevel::Licenciatura);
    }

    #[test]
    fn detail_response_carries_profile() {
        let user = sample_user();
        let detail = UserDetailResponse::from(&user);
        assert_eq!(detail.user_id, user.user_id);
        assert_eq!(detail.profile.environment, Environment::Casa);
    }
}
