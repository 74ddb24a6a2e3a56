use std::collections::HashMap;

use url::Url;

use crate::errors::{BridgeError, BridgeResult};

/// Immutable mapping from agent name to the base URL of the process serving it.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Url>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from raw name/URL pairs, rejecting URLs that do not parse.
    pub fn from_urls<I, K, V>(entries: I) -> BridgeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut agents = HashMap::new();
        for (name, raw) in entries {
            let name = name.into();
            let url = Url::parse(raw.as_ref()).map_err(|source| BridgeError::InvalidAgentUrl {
                agent: name.clone(),
                source,
            })?;
            agents.insert(name, url);
        }
        Ok(Self { agents })
    }

    pub fn with_agent<S: Into<String>>(mut self, name: S, url: Url) -> Self {
        self.agents.insert(name.into(), url);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&Url> {
        self.agents.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
