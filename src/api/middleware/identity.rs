//! Caller identity middleware.
//!
//! Resolves the caller from the trusted `X-User-Context` header injected by
//! the upstream API gateway, which has already authenticated the request.
//! Without the header, falls back to decoding the bearer token locally with
//! the shared secret (development, direct access). The resolved identity is
//! inserted into the request extensions for handlers to enforce ownership.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, USER_CONTEXT_HEADER};
use crate::errors::{AppError, AppResult};

/// Authenticated caller resolved from the identity assertion or token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
}

/// Identity resolution middleware for self-only endpoints.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let caller = resolve_caller(&state, request.headers())?;
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

/// Resolve the caller id: gateway assertion first, bearer token second.
///
/// An absent or malformed assertion and an absent/malformed Authorization
/// header are both `Unauthenticated`; a present but unverifiable token is
/// `InvalidToken`.
fn resolve_caller(state: &AppState, headers: &HeaderMap) -> AppResult<CurrentUser> {
    if let Some(value) = headers.get(USER_CONTEXT_HEADER) {
        let raw = value.to_str().map_err(|_| AppError::Unauthenticated)?;
        let id = Uuid::parse_str(raw.trim()).map_err(|_| AppError::Unauthenticated)?;
        return Ok(CurrentUser { id });
    }

    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthenticated)?;

    let claims = state.auth_service.verify_token(token)?;
    Ok(CurrentUser { id: claims.sub })
}

/// Self-only enforcement: the caller may act on their own record and nothing
/// else, whether or not the target exists.
pub fn ensure_self(caller: &CurrentUser, target: Uuid) -> AppResult<()> {
    if caller.id == target {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_self_allows_own_record() {
        let id = Uuid::new_v4();
        let caller = CurrentUser { id };
        assert!(ensure_self(&caller, id).is_ok());
    }

    #[test]
    fn ensure_self_rejects_other_records() {
        let caller = CurrentUser { id: Uuid::new_v4() };
        let result = ensure_self(&caller, Uuid::new_v4());
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
