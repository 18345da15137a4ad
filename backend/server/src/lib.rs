//! Backend of the donation platform.
//!
//! # Infrastructure
//! - Single axum server exposing the user endpoints under `/api/user`
//! - Users live in a redis hash keyed by email, see [`database`]
//! - Without `DB_URL` the server falls back to an in-memory store, handy for local frontend work
//!
//!
//!
//! # Environment
//!
//! | Variable | Default | Notes |
//! |---|---|---|
//! | `PORT` | `3000` | |
//! | `DB_URL` | none | also read from `/run/secrets/DB_URL` |
//! | `CORS_ORIGIN` | `http://localhost:5173` | the frontend dev server |
//!
//! Log level is controlled through `RUST_LOG`.
//!
//!
//!
//! # Notes
//!
//! ## Passwords
//! Passwords are stored and compared as plaintext and echoed back in `data`.
//! This keeps existing accounts and clients working. Hashing is a deliberate,
//! separate migration since every stored record must be rewritten.
//!
//!
//!
//! # Setup
//!
//! Run against a local redis.
//! ```sh
//! DB_URL=redis://127.0.0.1:6379 RUST_LOG=info cargo run -p server
//! ```
//!
//! Run in memory.
//! ```sh
//! RUST_LOG=debug cargo run -p server
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::post,
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{login_handler, signup_handler};
use state::State;

use models::{LOGIN_PATH, SIGNUP_PATH};

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");
    let app = app(state.clone())?;

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

pub fn app(state: Arc<State>) -> Result<Router> {
    let cors = cors_layer(&state.config)?;

    Ok(Router::new()
        .route(SIGNUP_PATH, post(signup_handler))
        .route(LOGIN_PATH, post(login_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS_ORIGIN {}", config.cors_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
