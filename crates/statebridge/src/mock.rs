use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use bytes::Bytes;
use http::{Request, Response, StatusCode};
use url::Url;

use crate::client::StateSource;
use crate::errors::{BridgeError, BridgeResult};
use crate::models::state::AgentState;

/// A state source that returns the same state for every thread and records calls
pub struct MockStateSource {
    state: AgentState,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockStateSource {
    pub fn new(state: AgentState) -> Self {
        Self {
            state,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(agent_url, thread_id)` for every fetch so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateSource for MockStateSource {
    async fn fetch(&self, agent_url: &Url, thread_id: &str, _timeout: Duration) -> AgentState {
        self.calls
            .lock()
            .unwrap()
            .push((agent_url.to_string(), thread_id.to_string()));
        self.state.clone()
    }
}

pub struct PanickingStateSource;

#[async_trait]
impl StateSource for PanickingStateSource {
    async fn fetch(&self, _agent_url: &Url, _thread_id: &str, _timeout: Duration) -> AgentState {
        panic!("state source exploded");
    }
}

/// A runtime that keeps every request it is given
pub struct MockRuntime {
    received: Mutex<Vec<Request<Bytes>>>,
    fail: bool,
}

impl MockRuntime {
    pub const BODY: &'static [u8] = br#"{"data":{"fromRuntime":true}}"#;

    pub fn new() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn received(&self) -> Vec<Request<Bytes>> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|request| {
                let mut copy = Request::new(request.body().clone());
                *copy.method_mut() = request.method().clone();
                *copy.uri_mut() = request.uri().clone();
                *copy.headers_mut() = request.headers().clone();
                copy
            })
            .collect()
    }
}

#[async_trait]
impl crate::runtime::Runtime for MockRuntime {
    async fn forward(&self, request: Request<Bytes>) -> BridgeResult<Response<Body>> {
        self.received.lock().unwrap().push(request);
        if self.fail {
            return Err(BridgeError::Forward("runtime down".to_string()));
        }
        Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Body::from(Self::BODY))?)
    }
}
