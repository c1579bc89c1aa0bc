//! API middleware.

mod identity;
mod rate_limit;

pub use identity::{ensure_self, identity_middleware, CurrentUser};
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware};
