//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: record store, reorder drafts (public)
//! - `/api/*`            - JSON API (session token required, except login)
//! - `/*`                - Web pages (session cookie required, except login)
//! - `/static/*`         - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on login
//! - **Authentication** - Session token (API) or session cookie (web)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use anyhow::Result;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Routes and authentication without rate limiting.
///
/// Used directly by handler tests; [`app_router`] adds the rate limiters.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes(&state))
        .merge(web_routes(&state))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .merge(api::routes::public_routes())
}

fn web_routes(state: &AppState) -> Router<AppState> {
    web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        ))
        .merge(web::routes::public_routes())
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// # Errors
///
/// Returns an error if a rate limiter cannot be configured.
pub fn app_router(state: AppState, behind_proxy: bool) -> Result<NormalizePath<Router>> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::layer(behind_proxy)?)
        .merge(
            api::routes::public_routes().layer(rate_limit::secure_layer(behind_proxy)?),
        );

    let web_protected = web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        ))
        .layer(rate_limit::layer(behind_proxy)?);

    let web_public = web::routes::public_routes().layer(rate_limit::secure_layer(behind_proxy)?);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .merge(web_protected)
        .merge(web_public)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
