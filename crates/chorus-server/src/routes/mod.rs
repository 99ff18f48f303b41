// Export route modules
pub mod ask;
pub mod providers;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

/// Largest request body accepted by the API
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

// Function to configure all routes
pub fn configure(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .merge(ask::routes(state.clone()))
        .merge(providers::routes(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors);

    match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    }
}
