use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Dashboard Router Module
///
/// The user-facing area: wallet, KYC verification and chat. Any authenticated
/// role may enter, and it is where misrouted sessions are sent.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/dashboard/wallet", get(handlers::dashboard_page))
        .route("/dashboard/kyc", get(handlers::dashboard_page))
        .route("/dashboard/chat", get(handlers::dashboard_page))
}
