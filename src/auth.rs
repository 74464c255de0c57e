use std::{
    convert::Infallible,
    sync::{Arc, LazyLock},
};

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};
use regex::Regex;

use crate::{
    error::{AccessError, AuthError},
    models::{Role, Session, SessionUser},
};

/// Anything shaped like `local@domain.tld` with no whitespace.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// PrivilegedAccount
///
/// A fixed (email, password, role) entry for a staff account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegedAccount {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl PrivilegedAccount {
    pub fn new(email: &str, password: &str, role: Role) -> Self {
        Self {
            email: email.to_lowercase(),
            password: password.to_string(),
            role,
        }
    }
}

/// AccountDirectory Trait
///
/// The credential lookup collaborator used by the session issuer. Only
/// privileged (admin/moderator) accounts live in a directory; every other
/// well-formed email is treated as a regular `user`.
///
/// **Send + Sync + async_trait** let the directory be shared as
/// `Arc<dyn AccountDirectory>` across request tasks, and let a remote
/// credential store replace the static table later.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Looks up a privileged account by lower-cased email.
    async fn privileged_account(&self, email: &str) -> Option<PrivilegedAccount>;
}

/// AccountDirectoryState
///
/// The concrete type used to share the directory across the application state.
pub type AccountDirectoryState = Arc<dyn AccountDirectory>;

/// StaticAccountDirectory
///
/// The built-in demonstration table of staff accounts.
#[derive(Debug, Clone)]
pub struct StaticAccountDirectory {
    accounts: Vec<PrivilegedAccount>,
}

impl StaticAccountDirectory {
    pub fn new(accounts: Vec<PrivilegedAccount>) -> Self {
        Self { accounts }
    }
}

impl Default for StaticAccountDirectory {
    fn default() -> Self {
        Self::new(vec![
            PrivilegedAccount::new("admin@astralcore.io", "admin", Role::Admin),
            PrivilegedAccount::new("moderator@astralcore.io", "moderator", Role::Moderator),
        ])
    }
}

#[async_trait]
impl AccountDirectory for StaticAccountDirectory {
    async fn privileged_account(&self, email: &str) -> Option<PrivilegedAccount> {
        self.accounts
            .iter()
            .find(|account| account.email == email)
            .cloned()
    }
}

/// issue_session
///
/// Validates a login attempt and returns the identity to embed in a new session.
///
/// 1. Empty (or whitespace-only) email or password: `MissingCredentials`.
/// 2. Email of a privileged account: the password must match exactly, otherwise
///    `InvalidCredentials`.
/// 3. Any other email-shaped address is accepted as `Role::User`; anything
///    else is `InvalidCredentials`.
///
/// Building the `Session` and setting the cookie is the caller's job.
pub async fn issue_session(
    directory: &dyn AccountDirectory,
    email: &str,
    password: &str,
) -> Result<SessionUser, AuthError> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    if let Some(account) = directory.privileged_account(&email.to_lowercase()).await {
        if account.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        return Ok(SessionUser {
            email: email.to_string(),
            role: account.role,
        });
    }

    if !EMAIL_SHAPE.is_match(email) {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(SessionUser {
        email: email.to_string(),
        role: Role::User,
    })
}

/// CurrentSession Extractor
///
/// The session the access guard admitted for this request. The guard
/// middleware places the decoded `Session` in the request extensions on
/// `Allow`; handlers behind the guard take `CurrentSession` as an argument.
///
/// Rejection: `AccessError::MissingSession` (401) when no session was attached,
/// e.g. on a public route or when the guard layer is absent.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AccessError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or(AccessError::MissingSession)
    }
}

/// `Option<CurrentSession>` for routes that work with or without a session
/// (public pages).
impl<S> OptionalFromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().cloned().map(CurrentSession))
    }
}
