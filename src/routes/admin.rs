use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Pages nested under `/admin`, restricted to the `admin` role.
///
/// Access Control:
/// The guard rejects every other role before these handlers run. The API
/// handlers repeat the role check so they stay safe if mounted elsewhere.
pub fn admin_pages() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::dashboard_page))
        // User management.
        .route("/users", get(handlers::dashboard_page))
        // KYC approvals.
        .route("/kyc", get(handlers::dashboard_page))
}

/// JSON endpoints under `/api/admin`.
pub fn admin_api() -> Router<AppState> {
    Router::new().route("/api/admin/overview", get(handlers::admin_overview))
}
