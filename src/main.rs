use astralcore_portal::{AppConfig, AppState, Env, create_router};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: loads configuration, initializes logging, assembles the
/// application state and serves the gateway.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");

    // 2. Logging
    // RUST_LOG takes priority over the development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "astralcore_portal=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Gateway starting in {:?} mode", config.env);

    // 3. Session token format
    if config.session_secret.is_none() {
        if config.env == Env::Production {
            tracing::warn!(
                "SESSION_SECRET is not set: session cookies are unsigned and their role claim can be edited by clients"
            );
        } else {
            tracing::info!("Session cookies are unsigned (no SESSION_SECRET)");
        }
    }

    // 4. State and router
    let bind_addr = config.bind_addr;
    let app = create_router(AppState::from_config(config));

    let listener = TcpListener::bind(bind_addr)
        .await
        .expect("FATAL: failed to bind listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: server terminated unexpectedly");
}
