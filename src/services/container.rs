//! Service Container - Centralized service access.
//!
//! Wires the repository into the service implementations once, at startup,
//! and hands shared trait objects to the API layer.

use std::sync::Arc;

use super::{AuthService, UserService};
use crate::config::Config;
use crate::domain::CommonPasswords;
use crate::infra::UserStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(auth_service: Arc<dyn AuthService>, user_service: Arc<dyn UserService>) -> Self {
        Self {
            auth_service,
            user_service,
        }
    }

    /// Create service container from a database connection, configuration
    /// and the preloaded common-password set
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        common_passwords: Arc<CommonPasswords>,
    ) -> Self {
        use super::{Authenticator, UserManager};

        let repo = Arc::new(UserStore::new(db));
        let auth_service = Arc::new(Authenticator::new(repo.clone(), config, common_passwords));
        let user_service = Arc::new(UserManager::new(repo));

        Self {
            auth_service,
            user_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
