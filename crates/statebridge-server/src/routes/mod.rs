// Export route modules
pub mod graphql;
pub mod health;

use crate::logging::log_requests;
use crate::state::AppState;
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::routes())
        .merge(graphql::routes(state))
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
}
