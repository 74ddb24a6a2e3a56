use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use url::Url;

use crate::errors::{BridgeResult, FetchError};
use crate::models::state::AgentState;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const LOAD_STATE_PATH: &str = "load_state";

/// Somewhere thread state can be loaded from.
///
/// Implementations never fail: anything that goes wrong is reported as
/// [`AgentState::empty`].
#[async_trait]
pub trait StateSource: Send + Sync {
    async fn fetch(&self, agent_url: &Url, thread_id: &str, timeout: Duration) -> AgentState;
}

/// Loads thread state from an agent's `/load_state` endpoint.
#[derive(Debug, Clone)]
pub struct StateClient {
    client: Client,
}

impl StateClient {
    pub fn new() -> BridgeResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    async fn try_fetch(&self, agent_url: &Url, thread_id: &str) -> Result<AgentState, FetchError> {
        let url = format!(
            "{}/{}",
            agent_url.as_str().trim_end_matches('/'),
            LOAD_STATE_PATH
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({ "threadId": thread_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body: Value = response.json().await?;
        decode_state(body)
    }
}

#[async_trait]
impl StateSource for StateClient {
    async fn fetch(&self, agent_url: &Url, thread_id: &str, timeout: Duration) -> AgentState {
        match tokio::time::timeout(timeout, self.try_fetch(agent_url, thread_id)).await {
            Ok(Ok(state)) => {
                tracing::debug!(
                    thread_id,
                    messages = state.messages.len(),
                    "Loaded thread state from {}",
                    agent_url
                );
                state
            }
            Ok(Err(e)) => {
                tracing::warn!(thread_id, "Failed to load state from {}: {}", agent_url, e);
                AgentState::empty()
            }
            Err(_) => {
                let e = FetchError::Timeout(timeout);
                tracing::warn!(thread_id, "Failed to load state from {}: {}", agent_url, e);
                AgentState::empty()
            }
        }
    }
}

/// Decode a `/load_state` body. Only the outer shape is checked; the
/// messages are kept exactly as the agent sent them, in order.
pub fn decode_state(body: Value) -> Result<AgentState, FetchError> {
    let Value::Object(mut body) = body else {
        return Err(FetchError::Decode("response is not an object".to_string()));
    };

    let messages = match body.remove("messages") {
        Some(Value::Array(messages)) => messages,
        Some(_) => return Err(FetchError::Decode("`messages` is not an array".to_string())),
        None => return Err(FetchError::Decode("missing `messages`".to_string())),
    };

    let state = match body.remove("state") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(state)) => state,
        Some(_) => return Err(FetchError::Decode("`state` is not an object".to_string())),
    };

    Ok(AgentState::new(messages, state))
}
