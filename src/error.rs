use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// AuthError
///
/// Failures of the login flow. Both are answered with a JSON error body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password absent (or only whitespace).
    #[error("email and password are required")]
    MissingCredentials,
    /// Credentials present but rejected by the account policy.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// AccessError
///
/// The reasons the access guard refuses a request. In a browser navigation
/// these become redirects; in the API context they become 401/403 bodies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("authentication required")]
    MissingSession,
    #[error("session is invalid")]
    MalformedSession,
    #[error("session has expired")]
    ExpiredSession,
    #[error("insufficient role")]
    InsufficientRole,
}

impl AccessError {
    /// Whether the stored cookie is unusable and should be deleted.
    pub fn clears_session(&self) -> bool {
        matches!(
            self,
            AccessError::MalformedSession | AccessError::ExpiredSession
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AccessError::InsufficientRole => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
