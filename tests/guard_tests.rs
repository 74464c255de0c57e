use astralcore_portal::{
    AccessGuard, Decision, RouteTable, SessionCodec,
    error::AccessError,
    guard::{RouteClass, login_redirect},
    models::{Role, Session},
    session::SESSION_TTL_MILLIS,
};

// --- Helpers ---

const NOW: i64 = 1_750_000_000_000;
const HOUR: i64 = 60 * 60 * 1000;

fn guard() -> AccessGuard {
    AccessGuard::new(RouteTable::default(), SessionCodec::Plain)
}

fn cookie_for(role: Role, issued_at: i64) -> String {
    let session = Session::new(format!("{}@astralcore.io", role), role, issued_at);
    SessionCodec::Plain.encode(&session).unwrap()
}

fn fresh_cookie(role: Role) -> String {
    cookie_for(role, NOW - HOUR)
}

fn redirect_location(decision: Decision) -> (String, bool) {
    match decision {
        Decision::RedirectTo {
            location,
            clear_session,
        } => (location, clear_session),
        other => panic!("expected a redirect, got {:?}", other),
    }
}

// --- Route classification ---

#[test]
fn test_classification_by_prefix() {
    let routes = RouteTable::default();

    assert_eq!(routes.classify("/"), RouteClass::Public);
    assert_eq!(routes.classify("/login"), RouteClass::Public);
    assert_eq!(routes.classify("/admin"), RouteClass::AdminOnly);
    assert_eq!(routes.classify("/admin/kyc"), RouteClass::AdminOnly);
    assert_eq!(routes.classify("/moderator/chat"), RouteClass::ModeratorOrAdmin);
    assert_eq!(routes.classify("/dashboard/wallet"), RouteClass::Protected);
    assert_eq!(routes.classify("/api/admin/overview"), RouteClass::AdminOnly);
    assert_eq!(
        routes.classify("/api/moderator/overview"),
        RouteClass::ModeratorOrAdmin
    );
    // Unlisted paths default to protected.
    assert_eq!(routes.classify("/promotions"), RouteClass::Protected);
}

#[test]
fn test_public_paths_match_exactly() {
    let routes = RouteTable::default();

    assert!(routes.is_public("/login"));
    assert!(!routes.is_public("/login/extra"));
    assert!(!routes.is_public("/registered"));
    assert_eq!(routes.classify("/login/extra"), RouteClass::Protected);
}

#[test]
fn test_most_specific_prefix_wins() {
    let routes = RouteTable::new(
        [],
        [
            ("/admin", RouteClass::AdminOnly),
            ("/admin/support", RouteClass::ModeratorOrAdmin),
        ],
    );

    assert_eq!(routes.classify("/admin/users"), RouteClass::AdminOnly);
    assert_eq!(
        routes.classify("/admin/support/tickets"),
        RouteClass::ModeratorOrAdmin
    );
}

#[test]
fn test_admin_is_permitted_wherever_moderator_is() {
    assert!(RouteClass::ModeratorOrAdmin.permits(Role::Admin));
    assert!(RouteClass::ModeratorOrAdmin.permits(Role::Moderator));
    assert!(!RouteClass::ModeratorOrAdmin.permits(Role::User));
    assert!(RouteClass::AdminOnly.permits(Role::Admin));
    assert!(!RouteClass::AdminOnly.permits(Role::Moderator));
}

// --- Public routes ---

#[test]
fn test_public_paths_allowed_regardless_of_cookie() {
    let guard = guard();
    let cookies = [
        None,
        Some("not-a-session".to_string()),
        Some(cookie_for(Role::User, NOW - SESSION_TTL_MILLIS - 1)),
        Some(fresh_cookie(Role::Admin)),
    ];

    for path in ["/", "/login", "/register", "/forgot-password"] {
        for cookie in &cookies {
            let decision = guard.authorize(path, cookie.as_deref(), NOW);
            assert!(
                matches!(decision, Decision::Allow { .. }),
                "{} with {:?} should be allowed",
                path,
                cookie
            );
        }
    }
}

#[test]
fn test_public_path_attaches_valid_session() {
    let decision = guard().authorize("/", Some(&fresh_cookie(Role::User)), NOW);

    match decision {
        Decision::Allow { session: Some(session) } => assert_eq!(session.role, Role::User),
        other => panic!("expected allow with session, got {:?}", other),
    }
}

// --- Missing / malformed / expired sessions ---

#[test]
fn test_missing_session_redirects_to_login_with_return_path() {
    let (location, clear) = redirect_location(guard().authorize("/dashboard/wallet", None, NOW));

    assert_eq!(location, "/login?redirect=%2Fdashboard%2Fwallet");
    assert!(!clear);
}

#[test]
fn test_malformed_session_is_cleared_and_redirected() {
    for cookie in ["garbage", "%7B%22email%22%3A1%7D", "%7Bnot-json"] {
        let (location, clear) = redirect_location(guard().authorize("/dashboard", Some(cookie), NOW));
        assert_eq!(location, login_redirect("/dashboard"));
        assert!(clear, "malformed cookie {:?} should be cleared", cookie);
    }
}

#[test]
fn test_unknown_role_is_malformed() {
    let cookie = urlencoding::encode(r#"{"email":"a@b.io","role":"root","timestamp":0}"#).into_owned();
    let (location, clear) = redirect_location(guard().authorize("/dashboard", Some(&cookie), NOW));

    assert!(location.starts_with("/login"));
    assert!(clear);
}

#[test]
fn test_expired_session_is_cleared_and_redirected() {
    let cookie = cookie_for(Role::Admin, NOW - SESSION_TTL_MILLIS - 1);
    let (location, clear) = redirect_location(guard().authorize("/admin", Some(&cookie), NOW));

    assert_eq!(location, "/login?redirect=%2Fadmin");
    assert!(clear);
}

#[test]
fn test_session_at_exact_ttl_is_still_valid() {
    let cookie = cookie_for(Role::User, NOW - SESSION_TTL_MILLIS);
    let decision = guard().authorize("/dashboard", Some(&cookie), NOW);

    assert!(matches!(decision, Decision::Allow { session: Some(_) }));
}

#[test]
fn test_future_dated_session_is_rejected() {
    let cookie = cookie_for(Role::Admin, NOW + HOUR);
    let result = guard().check("/admin", Some(&cookie), NOW);

    assert_eq!(result.unwrap_err(), AccessError::MalformedSession);
}

#[test]
fn test_out_of_range_timestamp_is_malformed() {
    for issued_at in [i64::MIN, i64::MAX] {
        let cookie = cookie_for(Role::Admin, issued_at);
        let (location, clear) = redirect_location(guard().authorize("/admin", Some(&cookie), NOW));

        assert_eq!(location, "/login?redirect=%2Fadmin");
        assert!(clear);
    }

    // A clock before the epoch must not overflow either.
    let cookie = cookie_for(Role::User, i64::MAX);
    let result = guard().check("/dashboard", Some(&cookie), -HOUR);
    assert_eq!(result.unwrap_err(), AccessError::MalformedSession);
}

#[test]
fn test_session_age() {
    let session = Session::new("x@y.com", Role::User, NOW - HOUR);

    assert_eq!(session.age_millis(NOW), Some(HOUR));
    assert_eq!(session.age_millis(NOW - 2 * HOUR), Some(-HOUR));
    assert_eq!(Session::new("x@y.com", Role::User, i64::MIN).age_millis(NOW), None);
}

// --- Role checks ---

#[test]
fn test_user_on_admin_is_bounced_to_dashboard() {
    let (location, clear) =
        redirect_location(guard().authorize("/admin/users", Some(&fresh_cookie(Role::User)), NOW));

    assert_eq!(location, "/dashboard");
    assert!(!clear);
}

#[test]
fn test_user_on_moderator_is_bounced_to_dashboard() {
    let (location, _) =
        redirect_location(guard().authorize("/moderator", Some(&fresh_cookie(Role::User)), NOW));

    assert_eq!(location, "/dashboard");
}

#[test]
fn test_moderator_access() {
    let guard = guard();
    let cookie = fresh_cookie(Role::Moderator);

    let (location, _) = redirect_location(guard.authorize("/admin", Some(&cookie), NOW));
    assert_eq!(location, "/dashboard");

    assert!(matches!(
        guard.authorize("/moderator", Some(&cookie), NOW),
        Decision::Allow { session: Some(_) }
    ));
    assert!(matches!(
        guard.authorize("/dashboard", Some(&cookie), NOW),
        Decision::Allow { session: Some(_) }
    ));
}

#[test]
fn test_admin_is_allowed_everywhere() {
    let guard = guard();
    let cookie = fresh_cookie(Role::Admin);

    for path in ["/admin", "/admin/kyc", "/moderator", "/moderator/chat", "/dashboard", "/anything"] {
        assert!(
            matches!(guard.authorize(path, Some(&cookie), NOW), Decision::Allow { session: Some(_) }),
            "admin should reach {}",
            path
        );
    }
}

#[test]
fn test_any_role_reaches_unlisted_paths() {
    let guard = guard();
    for role in [Role::User, Role::Moderator, Role::Admin] {
        let decision = guard.authorize("/promotions/summer", Some(&fresh_cookie(role)), NOW);
        assert!(matches!(decision, Decision::Allow { .. }));
    }
}

// --- API context ---

#[test]
fn test_api_without_session_is_unauthenticated() {
    let decision = guard().authorize("/api/wallet/balance", None, NOW);

    assert_eq!(
        decision,
        Decision::Unauthenticated {
            clear_session: false
        }
    );
}

#[test]
fn test_api_with_expired_session_clears_cookie() {
    let cookie = cookie_for(Role::User, NOW - SESSION_TTL_MILLIS - HOUR);
    let decision = guard().authorize("/api/wallet/balance", Some(&cookie), NOW);

    assert_eq!(decision, Decision::Unauthenticated { clear_session: true });
}

#[test]
fn test_api_role_mismatch_is_forbidden() {
    let guard = guard();

    assert_eq!(
        guard.authorize("/api/admin/overview", Some(&fresh_cookie(Role::Moderator)), NOW),
        Decision::Forbidden
    );
    assert_eq!(
        guard.authorize("/api/moderator/overview", Some(&fresh_cookie(Role::User)), NOW),
        Decision::Forbidden
    );
    assert!(matches!(
        guard.authorize("/api/moderator/overview", Some(&fresh_cookie(Role::Admin)), NOW),
        Decision::Allow { .. }
    ));
}

#[test]
fn test_auth_api_is_public() {
    let guard = guard();
    for path in ["/api/auth/login", "/api/auth/logout", "/api/auth/session"] {
        assert!(matches!(guard.authorize(path, None, NOW), Decision::Allow { .. }));
    }
}

// --- Signed sessions ---

#[test]
fn test_signed_guard_rejects_plain_cookie() {
    let guard = AccessGuard::new(
        RouteTable::default(),
        SessionCodec::signed(b"0123456789abcdef0123456789abcdef"),
    );

    // A forged, unsigned admin claim.
    let forged = fresh_cookie(Role::Admin);
    let (location, clear) = redirect_location(guard.authorize("/admin", Some(&forged), NOW));
    assert!(location.starts_with("/login"));
    assert!(clear);

    let genuine = guard
        .codec()
        .encode(&Session::new("admin@astralcore.io", Role::Admin, NOW))
        .unwrap();
    assert!(matches!(
        guard.authorize("/admin", Some(&genuine), NOW),
        Decision::Allow { session: Some(_) }
    ));
}
