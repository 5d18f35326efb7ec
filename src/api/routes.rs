//! API Routes
//!
//! Configures the Axum router with all blob server endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_blob_handler, health_handler, put_blob_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /blobs/*key` - Fetch a blob
/// - `PUT /blobs/*key` - Store a blob
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit: uploads above `max_blob_size` are refused with 413
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/blobs/*key", get(get_blob_handler).put(put_blob_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(state.max_blob_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
