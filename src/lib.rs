//! Auth API - Authentication and user-account microservice
//!
//! Registers users, authenticates them and issues bearer tokens, and lets a
//! user read/update/delete their own account record. The interesting part is
//! the credential pipeline: value-object validation (email, username), the
//! password-strength/hashing engine and the self-only authorization rule.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Value objects, the User aggregate and business rules
//! - **services**: Use-case orchestrators (register, login, get/update/delete)
//! - **infra**: Infrastructure concerns (database, repositories, cache)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Email, Password, User, Username};
pub use errors::{AppError, AppResult};
