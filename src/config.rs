use std::{env, net::SocketAddr};

use thiserror::Error;

/// Minimum length (in bytes) accepted for `SESSION_SECRET`. HS256 keys shorter
/// than the digest size are rejected at startup.
pub const MIN_SECRET_LEN: usize = 32;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// AppConfig
///
/// Holds the gateway's configuration. Immutable once loaded and shared with
/// handlers and the access guard through `FromRef`.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls Secure cookies, log format and Swagger UI.
    pub env: Env,
    // Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    // Optional HS256 key. When present, session cookies are signed tokens.
    pub session_secret: Option<String>,
}

/// Env
///
/// Defines the runtime context. `Production` hardens the session cookie
/// (`Secure`) and switches logging to JSON.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// ConfigError
///
/// Startup configuration failures. `main` aborts on any of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BIND_ADDR `{0}` is not a valid socket address")]
    InvalidBindAddr(String),
    #[error("SESSION_SECRET must be at least {} bytes long", MIN_SECRET_LEN)]
    WeakSessionSecret,
}

// Keeps the signing key out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for AppConfig {
    /// Provides a non-panicking local configuration, primarily for tests.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            session_secret: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables (after `dotenv` has
    /// populated them from a `.env` file).
    ///
    /// * `APP_ENV`: `production` or anything else for local.
    /// * `BIND_ADDR`: listener address, defaults to `0.0.0.0:3000`.
    /// * `SESSION_SECRET`: optional signing key for session tokens.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let raw_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        // An empty value is treated the same as an unset one.
        let session_secret = env::var("SESSION_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty());
        if let Some(secret) = &session_secret {
            if secret.len() < MIN_SECRET_LEN {
                return Err(ConfigError::WeakSessionSecret);
            }
        }

        Ok(Self {
            env,
            bind_addr,
            session_secret,
        })
    }

    /// Whether the session cookie carries the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.env == Env::Production
    }
}
