pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route(
            "/generate-label",
            get(handlers::generate_label_get).post(handlers::generate_label_post),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
