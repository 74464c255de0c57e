//! Session token encoding and the `astralcore-session` cookie.
//!
//! Two token formats are supported:
//!
//! * **Plain**: the session JSON itself. Anyone holding the cookie can edit
//!   the role claim; this is the historical dashboard behavior and remains the
//!   default when no `SESSION_SECRET` is configured.
//! * **Signed**: an HS256 JWT whose claims are the session JSON. Edits to the
//!   payload fail signature verification and are treated as malformed.
//!
//! Either way the token is percent-encoded before it is placed in the cookie,
//! and expiry is checked by the access guard, not by the token format.

use axum::http::{HeaderMap, HeaderValue, header};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::{config::AppConfig, models::Session};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "astralcore-session";

/// Cookie `Max-Age` in seconds (7 days).
pub const SESSION_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Fixed session time-to-live in milliseconds (7 days).
pub const SESSION_TTL_MILLIS: i64 = SESSION_MAX_AGE_SECS * 1000;

/// SessionCodecError
#[derive(Debug, Error)]
pub enum SessionCodecError {
    #[error("session cookie is not valid percent-encoded UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("session payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// SessionCodec
///
/// Converts sessions to and from cookie values. Selected once at startup from
/// the configuration and shared read-only through `AppState`.
#[derive(Clone)]
pub enum SessionCodec {
    Plain,
    Signed {
        encoding: EncodingKey,
        decoding: DecodingKey,
    },
}

impl SessionCodec {
    pub fn signed(secret: &[u8]) -> Self {
        SessionCodec::Signed {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        match &config.session_secret {
            Some(secret) => Self::signed(secret.as_bytes()),
            None => SessionCodec::Plain,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, SessionCodec::Signed { .. })
    }

    /// Serializes a session into a cookie-safe value.
    pub fn encode(&self, session: &Session) -> Result<String, SessionCodecError> {
        let token = match self {
            SessionCodec::Plain => serde_json::to_string(session)?,
            SessionCodec::Signed { encoding, .. } => {
                encode(&Header::new(Algorithm::HS256), session, encoding)?
            }
        };
        Ok(urlencoding::encode(&token).into_owned())
    }

    /// Parses a cookie value back into a session. Any failure means the
    /// cookie is malformed or was tampered with.
    pub fn decode(&self, cookie_value: &str) -> Result<Session, SessionCodecError> {
        let token = urlencoding::decode(cookie_value)?;
        match self {
            SessionCodec::Plain => Ok(serde_json::from_str(&token)?),
            SessionCodec::Signed { decoding, .. } => {
                let mut validation = Validation::new(Algorithm::HS256);
                // Expiry is owned by the guard (issue timestamp + TTL), not by `exp`.
                validation.validate_exp = false;
                validation.required_spec_claims.clear();
                let data = decode::<Session>(&*token, decoding, &validation)?;
                Ok(data.claims)
            }
        }
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// --- Cookie helpers ---

/// Builds the `Set-Cookie` value that stores a session.
pub fn session_cookie(value: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={value}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that deletes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Returns the raw value of the session cookie, if the request carries a
/// non-empty one. All `Cookie` headers are searched.
pub fn read_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Appends a `Set-Cookie` header to a response header map.
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: String) {
    match HeaderValue::try_from(cookie) {
        Ok(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Refusing to emit invalid Set-Cookie header: {}", e),
    }
}
