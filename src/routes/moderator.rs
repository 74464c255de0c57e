use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Moderator Router Module
///
/// Pages nested under `/moderator`. The guard admits `moderator` and `admin`
/// sessions; `user` sessions are bounced to `/dashboard`.
pub fn moderator_pages() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::dashboard_page))
        // KYC review queue.
        .route("/kyc", get(handlers::dashboard_page))
        // Chat moderation.
        .route("/chat", get(handlers::dashboard_page))
}

/// JSON endpoints under `/api/moderator`. Refused with 403 for `user` sessions.
pub fn moderator_api() -> Router<AppState> {
    Router::new().route("/api/moderator/overview", get(handlers::moderator_overview))
}
