pub mod files;
pub mod health;
pub mod store;

pub use files::*;
pub use health::*;
pub use store::*;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::logging_middleware;
use crate::state::AppState;

/// Builds the application router with all routes and layers.
///
/// Staged files are served unauthenticated under `/download/<id>.pdf`.
pub fn create_router(state: AppState) -> Router {
    let staged_files = ServeDir::new(&state.config.staging_dir);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/store", get(store_handler))
        .route("/store-from-text", post(store_from_text_handler))
        .nest_service("/download", staged_files)
        .route("/files", get(list_files_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}
