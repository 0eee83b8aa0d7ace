//! # vnscope-api — Axum API for Jurisdiction-Scoped Survey Access
//!
//! Serves the caller's jurisdiction, access checks, survey intake and
//! scope-filtered record listing. The caller's scope is always derived on
//! the server from the profile directory.
//!
//! ## API Surface
//!
//! | Route                            | Module                   |
//! |----------------------------------|--------------------------|
//! | `GET  /v1/scope`                 | [`routes::scope`]        |
//! | `POST /v1/access/{location,point,polygon}` | [`routes::access`] |
//! | `POST /v1/submissions[/validate]`| [`routes::submissions`]  |
//! | `GET  /v1/records[/:id]`         | [`routes::records`]      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod profiles;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        secret: state.config.auth_secret.clone(),
    };
    let profiles = state.profiles.clone();

    let api = Router::new()
        .merge(routes::scope::router())
        .merge(routes::access::router())
        .merge(routes::submissions::router())
        .merge(routes::records::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(profiles))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe.
async fn readiness() -> &'static str {
    "ready"
}
