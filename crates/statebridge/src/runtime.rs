use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Request, Response, Uri};
use reqwest::Client;
use url::Url;

use crate::errors::{BridgeError, BridgeResult};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(120);

/// The GraphQL runtime that serves every request this layer does not answer itself.
///
/// The request body arrives fully buffered; the response body is streamed
/// back as the runtime produces it.
#[async_trait]
pub trait Runtime: Send + Sync {
    async fn forward(&self, request: Request<Bytes>) -> BridgeResult<Response<Body>>;
}

/// Limits on reaching the runtime. `response` bounds the wait for the status
/// line and headers only, never the streamed body that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardTimeouts {
    pub connect: Duration,
    pub response: Duration,
}

impl Default for ForwardTimeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            response: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

/// Forwards requests over HTTP to a runtime listening at `base_url`.
#[derive(Debug, Clone)]
pub struct UpstreamRuntime {
    client: Client,
    base_url: Url,
    response_timeout: Duration,
}

impl UpstreamRuntime {
    pub fn new(base_url: Url, timeouts: ForwardTimeouts) -> BridgeResult<Self> {
        let client = Client::builder().connect_timeout(timeouts.connect).build()?;
        Ok(Self {
            client,
            base_url,
            response_timeout: timeouts.response,
        })
    }

    fn target(&self, uri: &Uri) -> String {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path_and_query
        )
    }
}

#[async_trait]
impl Runtime for UpstreamRuntime {
    async fn forward(&self, request: Request<Bytes>) -> BridgeResult<Response<Body>> {
        let (parts, body) = request.into_parts();
        let url = self.target(&parts.uri);
        tracing::debug!("Forwarding {} {} to runtime", parts.method, url);

        let send = self
            .client
            .request(parts.method, &url)
            .headers(forwardable_headers(&parts.headers))
            .body(body)
            .send();

        let response = match tokio::time::timeout(self.response_timeout, send).await {
            Ok(result) => result.map_err(|e| BridgeError::Forward(e.to_string()))?,
            Err(_) => {
                return Err(BridgeError::Forward(format!(
                    "no response within {:?}",
                    self.response_timeout
                )))
            }
        };

        let status = response.status();
        let headers = forwardable_headers(response.headers());

        let mut builder = Response::builder().status(status);
        if let Some(target) = builder.headers_mut() {
            target.extend(headers);
        }
        Ok(builder.body(Body::from_stream(response.bytes_stream()))?)
    }
}

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_forwardable(name: &HeaderName) -> bool {
    *name != header::HOST
        && *name != header::CONTENT_LENGTH
        && !HOP_BY_HOP.contains(&name.as_str())
}

/// Copy end-to-end headers. Length and host are recomputed by the client and server.
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if is_forwardable(name) {
            forwarded.append(name.clone(), value.clone());
        }
    }
    forwarded
}
