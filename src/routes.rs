//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /url/shortUrl/{code}` - Short link redirect (public, not rate limited)
//! - `GET  /health`              - Health check: database and mail (public)
//! - `/auth/*` credential routes - Public, strict rate limit
//! - everything else under `/auth`, `/user`, `/url` - Access token required
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer header or `accessToken` cookie
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware,
/// wrapped in trailing-slash normalization.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, behind_proxy))
}

/// The routes and middleware of [`app_router`] without path normalization.
pub fn router(state: AppState, behind_proxy: bool) -> Router {
    let credential_router = rate_limit::apply(
        api::routes::credential_routes(),
        rate_limit::STRICT,
        behind_proxy,
    );

    let protected_router = rate_limit::apply(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        rate_limit::RELAXED,
        behind_proxy,
    );

    let health_router = rate_limit::apply(
        Router::new().route("/health", get(health_handler)),
        rate_limit::RELAXED,
        behind_proxy,
    );

    Router::new()
        .route("/url/shortUrl/{code}", get(redirect_handler))
        .merge(health_router)
        .merge(credential_router)
        .merge(protected_router)
        .with_state(state)
        .layer(tracing::layer())
}
