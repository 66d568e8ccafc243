pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::documents::handlers;
use crate::export::handlers::handle_export;
use crate::state::AppState;

fn process_route() -> MethodRouter<AppState> {
    post(handlers::handle_process)
        .options(handlers::handle_preflight)
        .fallback(handlers::method_not_allowed)
}

pub fn build_router(state: AppState) -> Router {
    // Uploads are checked per file in the pipeline; the body limit only has to admit several.
    let body_limit = DefaultBodyLimit::max(state.config.max_request_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/documents/process", process_route())
        // Path of the serverless function earlier clients were built against
        .route("/functions/v1/ocr-extract", process_route())
        .route("/api/v1/export/:format", post(handle_export))
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
