pub mod chat;
pub mod error;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{chat::AppState, config::Config};

/// Request bodies are single chat messages.
const BODY_LIMIT_BYTES: usize = 16 * 1024;

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/healthz", get(health::health_check))
        .with_state(state);

    if cfg.server.enable_cors {
        match cfg.server.cors_origin.parse::<axum::http::HeaderValue>() {
            Ok(origin) => {
                let cors = CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                    .allow_headers([axum::http::header::CONTENT_TYPE]);
                router = router.layer(cors);
            }
            Err(e) => {
                tracing::warn!(origin = %cfg.server.cors_origin, error = %e, "invalid CORS origin, CORS disabled")
            }
        }
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(BODY_LIMIT_BYTES))
                .layer(TimeoutLayer::new(Duration::from_secs(cfg.server.request_timeout_secs))),
        )
        .layer(TraceLayer::new_for_http())
}
