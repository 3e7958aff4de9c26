//! Profile service: a single-profile demo app backed by MongoDB, built
//! for container deployment.
//!
//! # General Infrastructure
//! - One web container, one MongoDB container, talking over the compose
//!   network by service name (`mongodb`)
//! - The server starts serving immediately; a background task connects
//!   to MongoDB with bounded retries so container start order never
//!   matters
//! - If the retry budget runs out the server stays up: profile saves
//!   return 503, profile loads return `{}`
//!
//! # Routes
//! - `GET /` — the profile page
//! - `GET /profile-picture` — the profile photo
//! - `POST /update-profile` — upsert the one profile document
//! - `GET /get-profile` — fetch the one profile document
//!
//! # Setup
//!
//! Run the full stack.
//! ```sh
//! docker compose up --build
//! ```
//!
//! Run locally against a local MongoDB.
//! ```sh
//! MONGO_HOST=localhost MONGO_USER=admin MONGO_PASSWORD=password \
//!     cargo run -p profile-server
//! ```
//!
//! Smoke-test a running server.
//! ```sh
//! cargo run -p tester
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod profile;
pub mod routes;
pub mod state;
pub mod utils;

use routes::{get_profile_handler, index_handler, profile_picture_handler, update_profile_handler};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/profile-picture", get(profile_picture_handler))
        .route("/update-profile", post(update_profile_handler))
        .route("/get-profile", get(get_profile_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
