//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request logging at info so every request's method and path shows up
    // under the default log level, including ones that end in a 404.
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build the API router for the user resource
    let api = Router::new()
        // User CRUD
        .route("/users", get(handlers::list_users))
        .route("/users", post(handlers::create_user))
        .route("/users/{user_id}", get(handlers::get_user))
        .route("/users/{user_id}", put(handlers::update_user))
        .route("/users/{user_id}", delete(handlers::delete_user));

    // Combine all routes
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health_check))
        // Demonstration routes for the error classification pipeline
        .route("/error", get(handlers::trigger_error))
        .route("/validation-error", get(handlers::trigger_validation_error))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(trace)
        .layer(cors)
        .with_state(state)
}
