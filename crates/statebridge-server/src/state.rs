use crate::configuration::Settings;
use crate::error::ConfigError;
use statebridge::client::StateClient;
use statebridge::router::StateRouter;
use statebridge::runtime::UpstreamRuntime;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<StateRouter>,
    pub graphql_path: String,
}

impl AppState {
    pub fn new<S: Into<String>>(router: StateRouter, graphql_path: S) -> Self {
        Self {
            router: Arc::new(router),
            graphql_path: graphql_path.into(),
        }
    }

    /// Wire the router to the configured agents and the upstream runtime.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let runtime = UpstreamRuntime::new(settings.runtime_url()?, settings.forward_timeouts())?;
        let router = StateRouter::new(
            settings.agent_registry()?,
            Arc::new(StateClient::new()?),
            Arc::new(runtime),
            settings.router_settings(),
        );
        Ok(Self::new(router, settings.runtime.graphql_path.clone()))
    }
}
