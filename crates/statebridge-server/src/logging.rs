use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Log every request on the way in and on the way out with its status and duration.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    info!("--> {} {}", method, path);
    let response = next.run(request).await;
    info!(
        "<-- {} {} [{}] {:.2}s",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64()
    );

    response
}
