use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Identity ---

/// Role
///
/// The closed set of roles a session can carry. There is no numeric rank:
/// route access is decided by set membership (see `guard::RouteClass`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Moderator,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }

    /// The role's home page. Advertised to the client after login.
    pub fn landing_page(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Moderator => "/moderator",
            Role::User => "/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session
///
/// The authenticated identity carried by the client in the session cookie.
/// Immutable once issued; the server never stores it.
///
/// Serialized as `{"email", "role", "timestamp"}` where `timestamp` is the
/// issue time in milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub email: String,
    pub role: Role,
    #[serde(rename = "timestamp")]
    #[ts(type = "number")]
    pub issued_at_millis: i64,
}

impl Session {
    pub fn new(email: impl Into<String>, role: Role, issued_at_millis: i64) -> Self {
        Self {
            email: email.into(),
            role,
            issued_at_millis,
        }
    }

    /// Milliseconds elapsed between issuance and `now_millis`. Negative when
    /// the session claims to be issued in the future, `None` when the
    /// difference does not fit in an `i64`.
    pub fn age_millis(&self, now_millis: i64) -> Option<i64> {
        now_millis.checked_sub(self.issued_at_millis)
    }

    pub fn user(&self) -> SessionUser {
        SessionUser {
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// SessionUser
///
/// The public view of a session exposed to the client (no timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionUser {
    pub email: String,
    pub role: Role,
}

// --- Request Payloads ---

/// LoginRequest
///
/// Input payload for `POST /api/auth/login`. Missing fields deserialize to
/// empty strings so they surface as `MissingCredentials` rather than a
/// JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "admin@astralcore.io")]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// --- Response Schemas ---

/// LoginResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
    /// Landing page for the issued role.
    pub redirect: String,
}

/// LogoutResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LogoutResponse {
    pub success: bool,
}

/// SessionStatus
///
/// Output of `GET /api/auth/session`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
}

/// ErrorResponse
///
/// Uniform JSON error body for every 4xx produced by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// PageView
///
/// Descriptor returned for a dashboard page. The frontend renders the page;
/// the gateway only decides whether the caller may see it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageView {
    /// The request path of the page, e.g. `/admin/kyc`.
    pub page: String,
    pub user: Option<SessionUser>,
}

/// RoleOverview
///
/// Output of the moderator/admin overview APIs.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RoleOverview {
    pub email: String,
    pub role: Role,
    /// The panel the overview belongs to: `moderator` or `admin`.
    pub scope: String,
}
