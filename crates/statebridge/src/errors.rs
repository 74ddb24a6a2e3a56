use std::time::Duration;

use thiserror::Error;

/// Why a state fetch came back empty. Never leaves the client: every variant
/// is logged and then collapsed into [`crate::models::state::AgentState::empty`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("agent responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid load_state payload: {0}")]
    Decode(String),
}

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid agent URL for {agent}: {source}")]
    InvalidAgentUrl {
        agent: String,
        source: url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Forwarding to runtime failed: {0}")]
    Forward(String),

    #[error("Failed to build response: {0}")]
    Response(#[from] http::Error),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
