use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    error::AccessError,
    models::{Role, Session},
    session::{
        SESSION_TTL_MILLIS, SessionCodec, append_set_cookie, clear_session_cookie, now_millis,
        read_session_cookie,
    },
};

/// Where unauthenticated navigations are sent.
pub const LOGIN_PATH: &str = "/login";

/// Query parameter carrying the originally requested path through the login page.
pub const REDIRECT_PARAM: &str = "redirect";

/// Where authenticated users land when their role may not enter a route.
pub const ROLE_DENIED_PATH: &str = "/dashboard";

/// RouteClass
///
/// The access class a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No session required.
    Public,
    /// Any authenticated role.
    Protected,
    ModeratorOrAdmin,
    AdminOnly,
}

impl RouteClass {
    pub fn permits(self, role: Role) -> bool {
        match self {
            RouteClass::Public | RouteClass::Protected => true,
            RouteClass::ModeratorOrAdmin => matches!(role, Role::Moderator | Role::Admin),
            RouteClass::AdminOnly => role == Role::Admin,
        }
    }
}

/// RouteTable
///
/// Static classification of request paths. Public routes are matched exactly;
/// everything else is matched by prefix, most specific (longest) first, with
/// unmatched paths falling back to `Protected`.
#[derive(Debug, Clone)]
pub struct RouteTable {
    public: Vec<String>,
    prefixes: Vec<(String, RouteClass)>,
}

impl RouteTable {
    pub fn new<P, R>(public: P, prefixes: R) -> Self
    where
        P: IntoIterator<Item = &'static str>,
        R: IntoIterator<Item = (&'static str, RouteClass)>,
    {
        let public = public.into_iter().map(str::to_string).collect();
        let mut prefixes: Vec<(String, RouteClass)> = prefixes
            .into_iter()
            .map(|(prefix, class)| (prefix.to_string(), class))
            .collect();
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { public, prefixes }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|public| public == path)
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_public(path) {
            return RouteClass::Public;
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, class)| *class)
            .unwrap_or(RouteClass::Protected)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(
            [
                // Pages
                "/",
                "/login",
                "/register",
                "/forgot-password",
                // Auth API and liveness probe
                "/health",
                "/api/auth/login",
                "/api/auth/logout",
                "/api/auth/session",
            ],
            [
                ("/admin", RouteClass::AdminOnly),
                ("/moderator", RouteClass::ModeratorOrAdmin),
                ("/dashboard", RouteClass::Protected),
                ("/api/admin", RouteClass::AdminOnly),
                ("/api/moderator", RouteClass::ModeratorOrAdmin),
            ],
        )
    }
}

/// Decision
///
/// The outcome of authorizing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed. Carries the verified session when the request has one.
    Allow { session: Option<Session> },
    /// Browser navigation refused; send the client elsewhere.
    RedirectTo {
        location: String,
        clear_session: bool,
    },
    /// API request without a usable session (401).
    Unauthenticated { clear_session: bool },
    /// API request whose session role may not use the route (403).
    Forbidden,
}

/// Whether a path is a JSON API path rather than a page navigation.
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// The login URL carrying `path` as the round-trip parameter.
pub fn login_redirect(path: &str) -> String {
    format!(
        "{LOGIN_PATH}?{REDIRECT_PARAM}={}",
        urlencoding::encode(path)
    )
}

/// AccessGuard
///
/// Per-request authorization: decodes the session cookie, enforces the fixed
/// TTL and checks the route's role requirement. Holds no mutable state.
#[derive(Clone)]
pub struct AccessGuard {
    routes: RouteTable,
    codec: SessionCodec,
}

/// GuardState
///
/// The concrete type used to share the guard across the application state.
pub type GuardState = Arc<AccessGuard>;

impl AccessGuard {
    pub fn new(routes: RouteTable, codec: SessionCodec) -> Self {
        Self { routes, codec }
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// authorize
    ///
    /// Decides what happens to a request for `path` carrying the raw session
    /// cookie value `cookie`, at time `now_millis`.
    pub fn authorize(&self, path: &str, cookie: Option<&str>, now_millis: i64) -> Decision {
        match self.check(path, cookie, now_millis) {
            Ok(session) => Decision::Allow { session },
            Err(reason) => self.deny(path, reason),
        }
    }

    /// check
    ///
    /// The guard's state machine without the HTTP mapping. Returns the session
    /// to attach (optional on public routes) or the reason for refusal.
    pub fn check(
        &self,
        path: &str,
        cookie: Option<&str>,
        now_millis: i64,
    ) -> Result<Option<Session>, AccessError> {
        let class = self.routes.classify(path);
        if class == RouteClass::Public {
            // Always allowed; a valid session is still attached for the page's benefit.
            return Ok(cookie.and_then(|cookie| self.read_session(cookie, now_millis).ok()));
        }

        let cookie = cookie.ok_or(AccessError::MissingSession)?;
        let session = self.read_session(cookie, now_millis)?;

        if !class.permits(session.role) {
            return Err(AccessError::InsufficientRole);
        }
        Ok(Some(session))
    }

    /// read_session
    ///
    /// Decodes a cookie value and applies the validity rules shared by the
    /// guard and the session-check endpoint. A session stamped in the future is
    /// rejected as malformed; one older than the TTL is expired.
    pub fn read_session(&self, cookie: &str, now_millis: i64) -> Result<Session, AccessError> {
        let session = self.codec.decode(cookie).map_err(|e| {
            tracing::debug!("Rejecting session cookie: {}", e);
            AccessError::MalformedSession
        })?;

        let age = session
            .age_millis(now_millis)
            .filter(|age| *age >= 0)
            .ok_or(AccessError::MalformedSession)?;
        if age > SESSION_TTL_MILLIS {
            return Err(AccessError::ExpiredSession);
        }
        Ok(session)
    }

    fn deny(&self, path: &str, reason: AccessError) -> Decision {
        tracing::debug!(path, reason = %reason, "access denied");
        let clear_session = reason.clears_session();

        match (is_api_path(path), reason) {
            (true, AccessError::InsufficientRole) => Decision::Forbidden,
            (true, _) => Decision::Unauthenticated { clear_session },
            (false, AccessError::InsufficientRole) => Decision::RedirectTo {
                location: ROLE_DENIED_PATH.to_string(),
                clear_session: false,
            },
            (false, _) => Decision::RedirectTo {
                location: login_redirect(path),
                clear_session,
            },
        }
    }
}

/// access_guard
///
/// Middleware enforcing the `AccessGuard` decision on every routed request.
/// On `Allow` the verified `Session` is attached to the request extensions
/// for the `CurrentSession` extractor.
pub async fn access_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let cookie = read_session_cookie(request.headers());
    let secure = state.config.secure_cookies();

    match state.guard.authorize(&path, cookie.as_deref(), now_millis()) {
        Decision::Allow { session } => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        Decision::RedirectTo {
            location,
            clear_session,
        } => {
            let mut response = Redirect::temporary(&location).into_response();
            if clear_session {
                append_set_cookie(response.headers_mut(), clear_session_cookie(secure));
            }
            response
        }
        Decision::Unauthenticated { clear_session } => {
            // Missing, malformed and expired sessions all look the same to the caller.
            let mut response = AccessError::MissingSession.into_response();
            if clear_session {
                append_set_cookie(response.headers_mut(), clear_session_cookie(secure));
            }
            response
        }
        Decision::Forbidden => AccessError::InsufficientRole.into_response(),
    }
}
