use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints the guard lets through without a session. Every path here must
/// also be listed in the public set of `guard::RouteTable::default`, which
/// matches exactly (no prefixes).
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // Landing and account pages.
        .route("/", get(handlers::public_page))
        .route("/login", get(handlers::public_page))
        .route("/register", get(handlers::public_page))
        .route("/forgot-password", get(handlers::public_page))
        // POST /api/auth/login
        // Issues the session cookie.
        .route("/api/auth/login", post(handlers::login))
        // POST /api/auth/logout
        // Deletes the session cookie.
        .route("/api/auth/logout", post(handlers::logout))
        // GET /api/auth/session
        // Reports the current session; clears stale cookies.
        .route("/api/auth/session", get(handlers::get_session))
}
