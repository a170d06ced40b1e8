use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use heads_shared::protocol::{AUDIO_PATH, EVENTS_PATH, IMAGES_PATH, LOG_PATH};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::assets::{audio_handler, images_handler};
use crate::config::ServerConfig;
use crate::logs::{events, post_log, LogHub};

/// Shared app state passed to each handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub logs: LogHub,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let logs = LogHub::new(config.log_channel_capacity, config.log_depth);
        Self {
            config: Arc::new(config),
            logs,
        }
    }
}

/// All HTTP routes. Unmatched paths fall through to the public directory.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.public_dir);
    let max_log_bytes = state.config.max_log_bytes;

    Router::new()
        .route(IMAGES_PATH, get(images_handler))
        .route(AUDIO_PATH, get(audio_handler))
        .route(
            LOG_PATH,
            post(post_log).layer(DefaultBodyLimit::max(max_log_bytes)),
        )
        .route(EVENTS_PATH, get(events))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
