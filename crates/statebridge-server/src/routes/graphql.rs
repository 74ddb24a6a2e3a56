use crate::state::AppState;
use axum::{
    body::{self, Bytes},
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};

/// Largest request body read into memory before giving up.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

// Read the body once and rebuild an equivalent request around the buffered
// bytes, so the runtime can still parse it if we end up forwarding. Only the
// request is buffered; responses stream straight through.
async fn buffer_request(request: Request) -> Result<http::Request<Bytes>, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        tracing::warn!("Failed to read request body: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    Ok(http::Request::from_parts(parts, bytes))
}

// GraphQL endpoint: answers loadAgentState, forwards everything else.
async fn intercept(State(state): State<AppState>, request: Request) -> Response {
    match buffer_request(request).await {
        Ok(request) => state.router.handle(request).await,
        Err(status) => status.into_response(),
    }
}

// Any other path belongs to the runtime.
async fn forward(State(state): State<AppState>, request: Request) -> Response {
    match buffer_request(request).await {
        Ok(request) => state.router.forward(request).await,
        Err(status) => status.into_response(),
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    let path = state.graphql_path.clone();
    Router::new()
        .route(&path, any(intercept))
        .fallback(forward)
        .with_state(state)
}
