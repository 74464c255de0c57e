use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod session;

// Routes grouped by the access class the guard assigns them.
pub mod routes;
use routes::{admin, dashboard, moderator, public};

// --- Public Re-exports ---

pub use auth::{AccountDirectoryState, StaticAccountDirectory};
pub use config::{AppConfig, Env};
pub use guard::{AccessGuard, Decision, GuardState, RouteTable};
pub use session::SessionCodec;

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`
/// in the local environment.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::logout, handlers::get_session,
        handlers::moderator_overview, handlers::admin_overview
    ),
    components(
        schemas(
            models::Role, models::Session, models::SessionUser, models::LoginRequest,
            models::LoginResponse, models::LogoutResponse, models::SessionStatus,
            models::ErrorResponse, models::PageView, models::RoleOverview,
        )
    ),
    tags(
        (name = "astralcore-portal", description = "AstralCore dashboard gateway API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single immutable container shared by every request: configuration,
/// the credential directory and the access guard (which owns the session
/// codec).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub accounts: AccountDirectoryState,
    pub guard: GuardState,
}

impl AppState {
    /// Assembles the state for a configuration, using the built-in account
    /// table and the default route classification.
    pub fn from_config(config: AppConfig) -> Self {
        let codec = SessionCodec::from_config(&config);
        Self {
            accounts: Arc::new(StaticAccountDirectory::default()),
            guard: Arc::new(AccessGuard::new(RouteTable::default(), codec)),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for AccountDirectoryState {
    fn from_ref(app_state: &AppState) -> AccountDirectoryState {
        app_state.accounts.clone()
    }
}

impl FromRef<AppState> for GuardState {
    fn from_ref(app_state: &AppState) -> GuardState {
        app_state.guard.clone()
    }
}

/// create_router
///
/// Assembles every route, wraps them (and the 404 fallback) in the access
/// guard, then applies the observability stack.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // Guarded application routes. `route_layer` would skip the fallback, so the
    // guard is attached with `layer` after the fallback is registered.
    let mut app = Router::new()
        .merge(public::public_routes())
        .merge(dashboard::dashboard_routes())
        .nest("/moderator", moderator::moderator_pages())
        .merge(moderator::moderator_api())
        .nest("/admin", admin::admin_pages())
        .merge(admin::admin_api())
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::access_guard,
        ))
        .with_state(state.clone());

    // Documentation is a local-only convenience and sits outside the guard.
    if state.config.env == Env::Local {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
    .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request tracing span, correlated by the `x-request-id`
/// header set by `SetRequestIdLayer`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
