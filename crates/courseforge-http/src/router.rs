use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::HttpConfig;
use crate::handlers;
use crate::state::AppState;

/// Builds the API router.
pub fn router(state: AppState, config: &HttpConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/ai/generate-course", post(handlers::generate_course))
        .route("/ai/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}
