//! Application route configuration.

use axum::{middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::auth_handler::token_routes;
use super::handlers::{auth_routes, user_routes};
use super::middleware::{identity_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no auth, no rate limiting)
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public registration/login (stricter rate limiting)
        .merge(auth_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_auth_middleware,
        )))
        // Token validation for the gateway (no identity middleware)
        .merge(token_routes())
        // Self-only user routes (identity required + general rate limiting)
        .nest(
            "/users",
            user_routes()
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    identity_middleware,
                ))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_middleware,
                )),
        )
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
