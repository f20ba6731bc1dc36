//! Storyloom — HTTP surface over the story session engine.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the application router without middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::story::router())
        .with_state(state)
}
