use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use bytes::Bytes;
use futures::FutureExt;
use http::{header, HeaderValue, Request, Response, StatusCode};
use serde_json::{json, Value};

use crate::agents::AgentRegistry;
use crate::classifier::{classify, Classification, StateLoadQuery};
use crate::client::{StateSource, DEFAULT_TIMEOUT};
use crate::composer::compose;
use crate::errors::BridgeError;
use crate::models::response::StateLoadResponse;
use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterSettings {
    pub fetch_timeout: Duration,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Entry point for requests addressed to the GraphQL runtime.
///
/// `loadAgentState` is answered here from the agent's own checkpoint; all
/// other requests go to the runtime with their original body. A failure while
/// answering `loadAgentState` (a panic anywhere below the router) also falls
/// back to the runtime, so a request is never left unanswered by this layer.
pub struct StateRouter {
    agents: AgentRegistry,
    source: Arc<dyn StateSource>,
    runtime: Arc<dyn Runtime>,
    settings: RouterSettings,
}

impl StateRouter {
    pub fn new(
        agents: AgentRegistry,
        source: Arc<dyn StateSource>,
        runtime: Arc<dyn Runtime>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            agents,
            source,
            runtime,
            settings,
        }
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Handle a request whose body has already been read in full.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<Body> {
        let classification = match serde_json::from_slice::<Value>(request.body()) {
            Ok(payload) => classify(&payload),
            Err(_) => Classification::Passthrough,
        };

        match classification {
            Classification::Passthrough => self.forward(request).await,
            Classification::StateLoad(query) => {
                let attempt = AssertUnwindSafe(self.answer_state_load(query))
                    .catch_unwind()
                    .await;
                match attempt {
                    Ok(response) => response,
                    Err(_) => {
                        tracing::error!("loadAgentState panicked, delegating to runtime");
                        self.forward(request).await
                    }
                }
            }
        }
    }

    /// Resolve the agent and load the thread. Degraded cases answer with an
    /// empty thread rather than an error.
    pub async fn load_state(&self, query: &StateLoadQuery) -> StateLoadResponse {
        let (thread_id, agent_name) = match (&query.thread_id, &query.agent_name) {
            (Some(thread_id), Some(agent_name)) => (thread_id, agent_name),
            (thread_id, _) => {
                tracing::warn!("loadAgentState request is missing threadId or agentName");
                return StateLoadResponse::not_found(thread_id.clone().unwrap_or_default());
            }
        };

        let Some(agent_url) = self.agents.resolve(agent_name) else {
            tracing::warn!(thread_id = %thread_id, "Unknown agent: {}", agent_name);
            return StateLoadResponse::not_found(thread_id.as_str());
        };

        tracing::info!(thread_id = %thread_id, "Loading state from agent {}", agent_name);
        let state = self
            .source
            .fetch(agent_url, thread_id, self.settings.fetch_timeout)
            .await;
        compose(thread_id.as_str(), &state)
    }

    async fn answer_state_load(&self, query: StateLoadQuery) -> Response<Body> {
        let response = self.load_state(&query).await;
        json_response(StatusCode::OK, &response.into_graphql())
    }

    /// Hand a request to the runtime unchanged. Runtime failures become a 502.
    pub async fn forward(&self, request: Request<Bytes>) -> Response<Body> {
        match self.runtime.forward(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Runtime request failed: {}", e);
                bad_gateway(&e)
            }
        }
    }
}

fn json_response(status: StatusCode, value: &Value) -> Response<Body> {
    let mut response = Response::new(Body::from(value.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

fn bad_gateway(error: &BridgeError) -> Response<Body> {
    json_response(
        StatusCode::BAD_GATEWAY,
        &json!({ "errors": [{ "message": error.to_string() }] }),
    )
}
