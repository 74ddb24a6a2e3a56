use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

pub fn routes() -> Router {
    Router::new().route("/health", get(health))
}
