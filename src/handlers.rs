use crate::{
    AppState,
    auth::{CurrentSession, issue_session},
    error::AccessError,
    guard::RouteClass,
    models::{
        ErrorResponse, LoginRequest, LoginResponse, LogoutResponse, PageView, RoleOverview, Session,
        SessionStatus,
    },
    session::{
        append_set_cookie, clear_session_cookie, now_millis, read_session_cookie, session_cookie,
    },
};
use axum::{
    Json,
    extract::{OriginalUri, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

// --- Auth API ---

/// login
///
/// [Public Route] Validates credentials, issues a session and stores it in the
/// `astralcore-session` cookie.
///
/// *Errors*: 400 when email or password is missing, 401 when the credentials
/// are rejected. The password is never logged.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let identity = match issue_session(
        state.accounts.as_ref(),
        &payload.email,
        &payload.password,
    )
    .await
    {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(email = %payload.email.trim(), "Login rejected: {}", e);
            return e.into_response();
        }
    };

    let session = Session::new(identity.email, identity.role, now_millis());
    let token = match state.guard.codec().encode(&session) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to encode session: {}", e);
            let body = ErrorResponse {
                error: "failed to create session".to_string(),
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    tracing::info!(email = %session.email, role = %session.role, "Session issued");

    let body = LoginResponse {
        success: true,
        role: session.role,
        redirect: session.role.landing_page().to_string(),
    };
    let mut response = Json(body).into_response();
    append_set_cookie(
        response.headers_mut(),
        session_cookie(&token, state.config.secure_cookies()),
    );
    response
}

/// logout
///
/// [Public Route] Deletes the session cookie. Idempotent.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cookie cleared", body = LogoutResponse))
)]
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut response = Json(LogoutResponse { success: true }).into_response();
    append_set_cookie(
        response.headers_mut(),
        clear_session_cookie(state.config.secure_cookies()),
    );
    response
}

/// get_session
///
/// [Public Route] Reports whether the request carries a valid session.
///
/// An expired or malformed cookie is answered with `authenticated: false` and
/// deleted in the same response.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses((status = 200, description = "Session status", body = SessionStatus))
)]
pub async fn get_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let anonymous = SessionStatus {
        authenticated: false,
        user: None,
    };

    let Some(cookie) = read_session_cookie(&headers) else {
        return Json(anonymous).into_response();
    };

    match state.guard.read_session(&cookie, now_millis()) {
        Ok(session) => Json(SessionStatus {
            authenticated: true,
            user: Some(session.user()),
        })
        .into_response(),
        Err(e) => {
            tracing::debug!("Session check failed: {}", e);
            let mut response = Json(anonymous).into_response();
            append_set_cookie(
                response.headers_mut(),
                clear_session_cookie(state.config.secure_cookies()),
            );
            response
        }
    }
}

// --- Role APIs ---

/// moderator_overview
///
/// [Moderator Route] Summary of the caller's moderation scope.
#[utoipa::path(
    get,
    path = "/api/moderator/overview",
    responses(
        (status = 200, description = "Moderator overview", body = RoleOverview),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Role not permitted", body = ErrorResponse)
    )
)]
pub async fn moderator_overview(
    CurrentSession(session): CurrentSession,
) -> Result<Json<RoleOverview>, AccessError> {
    if !RouteClass::ModeratorOrAdmin.permits(session.role) {
        return Err(AccessError::InsufficientRole);
    }
    Ok(Json(RoleOverview {
        email: session.email,
        role: session.role,
        scope: "moderator".to_string(),
    }))
}

/// admin_overview
///
/// [Admin Route] Summary of the caller's administrative scope.
///
/// *Authorization*: the guard already restricts `/api/admin`; the role is
/// checked again here.
#[utoipa::path(
    get,
    path = "/api/admin/overview",
    responses(
        (status = 200, description = "Admin overview", body = RoleOverview),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Role not permitted", body = ErrorResponse)
    )
)]
pub async fn admin_overview(
    CurrentSession(session): CurrentSession,
) -> Result<Json<RoleOverview>, AccessError> {
    if !RouteClass::AdminOnly.permits(session.role) {
        return Err(AccessError::InsufficientRole);
    }
    Ok(Json(RoleOverview {
        email: session.email,
        role: session.role,
        scope: "admin".to_string(),
    }))
}

// --- Pages ---

/// public_page
///
/// [Public Route] Page descriptor for landing, login and registration pages.
/// Includes the user when a valid session happens to be present.
pub async fn public_page(
    OriginalUri(uri): OriginalUri,
    session: Option<CurrentSession>,
) -> Json<PageView> {
    Json(PageView {
        page: uri.path().to_string(),
        user: session.map(|CurrentSession(session)| session.user()),
    })
}

/// dashboard_page
///
/// [Guarded Route] Page descriptor for every dashboard, moderator and admin
/// page. Reaching this handler means the guard admitted the session.
pub async fn dashboard_page(
    OriginalUri(uri): OriginalUri,
    CurrentSession(session): CurrentSession,
) -> Json<PageView> {
    Json(PageView {
        page: uri.path().to_string(),
        user: Some(session.user()),
    })
}

/// not_found
///
/// Fallback for unknown paths. Runs behind the guard, so anonymous callers are
/// redirected to login before they ever see a 404.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("no route for {}", uri.path()),
        }),
    )
}
