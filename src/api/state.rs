//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::CommonPasswords;
use crate::infra::Cache;
use crate::services::{AuthService, ServiceContainer, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Redis cache (rate-limit counters)
    pub cache: Arc<Cache>,
}

impl AppState {
    /// Create application state from a database connection and config.
    ///
    /// The common-password set is loaded once by the caller and shared
    /// read-only from here on.
    pub fn from_config(
        db: sea_orm::DatabaseConnection,
        cache: Arc<Cache>,
        config: Config,
        common_passwords: Arc<CommonPasswords>,
    ) -> Self {
        let container = Services::from_connection(db, config, common_passwords);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            cache,
        }
    }

    /// Create application state with manually injected services (tests).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        cache: Arc<Cache>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            cache,
        }
    }
}
