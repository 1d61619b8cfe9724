//! Lottery number picker
//!
//! A pool of the numbers 1..=36 is shuffled once per reset; each Start/Stop
//! pair draws one number without replacement. The draw runs on the server
//! and every open page renders the same state over a WebSocket.

pub mod broadcast;
pub mod config;
pub mod draw;
pub mod error;
pub mod event_logger;
pub mod presenter;
pub mod protocol;
pub mod state;
pub mod ws;

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use rust_embed::Embed;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use draw::roll_loop::spawn_roll_loop;
use draw::TokioRollTimer;
use event_logger::EventLogger;
use state::AppState;
use ws::ws_handler;

/// Embedded static files
#[derive(Embed)]
#[folder = "static/"]
struct Assets;

/// Serve embedded static files
async fn serve_static(path: &str) -> impl IntoResponse {
    let path = if path.is_empty() { "index.html" } else { path };

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [("content-type", mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn index_handler() -> impl IntoResponse {
    serve_static("index.html").await
}

async fn static_handler(
    axum::extract::Path(path): axum::extract::Path<String>,
) -> impl IntoResponse {
    serve_static(&path).await
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Build shared state and start the roll loop. Must run inside a tokio runtime.
pub fn build_state(config: &ServerConfig) -> Arc<AppState> {
    let (timer, ticks) = TokioRollTimer::channel();
    let event_logger = EventLogger::open(config.event_log.as_deref());
    let state = Arc::new(AppState::new(timer, event_logger));

    spawn_roll_loop(state.clone(), ticks);
    state
}

/// Build the router over the given state
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/ws/draw", get(ws_handler))
        .route("/health", get(health_handler))
        .route("/{*path}", get(static_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
