use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use config::{Config, Environment, File};
use serde::Deserialize;
use statebridge::agents::AgentRegistry;
use statebridge::router::RouterSettings;
use statebridge::runtime::ForwardTimeouts;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Looked up in the working directory when no config file is given.
pub const DEFAULT_CONFIG_NAME: &str = "statebridge";

const REQUIRED_KEYS: [&str; 1] = ["runtime.url"];

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

#[derive(Debug, Deserialize)]
pub struct RuntimeSettings {
    pub url: String,
    #[serde(default = "default_graphql_path")]
    pub graphql_path: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub runtime: RuntimeSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub agents: HashMap<String, String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load settings from `file` (or an optional `statebridge.toml`) overlaid
    /// with `STATEBRIDGE_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_and_validate(file)
    }

    pub fn agent_registry(&self) -> Result<AgentRegistry, ConfigError> {
        let registry = AgentRegistry::from_urls(&self.agents)?;
        if registry.is_empty() {
            return Err(ConfigError::NoAgents);
        }
        Ok(registry)
    }

    pub fn runtime_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.runtime.url).map_err(|source| ConfigError::InvalidRuntimeUrl {
            url: self.runtime.url.clone(),
            source,
        })
    }

    pub fn forward_timeouts(&self) -> ForwardTimeouts {
        ForwardTimeouts {
            connect: Duration::from_millis(self.runtime.connect_timeout_ms),
            response: Duration::from_millis(self.runtime.response_timeout_ms),
        }
    }

    pub fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            fetch_timeout: Duration::from_millis(self.fetch.timeout_ms),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        self.runtime_url()?;
        if !self.runtime.graphql_path.starts_with('/') {
            return Err(ConfigError::InvalidGraphqlPath(
                self.runtime.graphql_path.clone(),
            ));
        }
        self.agent_registry()?;
        Ok(())
    }

    fn load_and_validate(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // Runtime and fetch defaults
            .set_default("runtime.graphql_path", default_graphql_path())?
            .set_default("runtime.connect_timeout_ms", default_connect_timeout_ms())?
            .set_default("runtime.response_timeout_ms", default_response_timeout_ms())?
            .set_default("fetch.timeout_ms", default_timeout_ms())?
            .add_source(file_source)
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        for key in REQUIRED_KEYS {
            if let Err(config::ConfigError::NotFound(_)) = config.get_string(key) {
                return Err(ConfigError::MissingEnvVar {
                    env_var: to_env_var(key),
                });
            }
        }

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        match result {
            Ok(settings) => {
                settings.validate()?;
                Ok(settings)
            }
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                if let Some(field) = missing_field(&err.to_string()) {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(&field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

/// Turn "missing field `url` for key `runtime`" into `runtime.url`.
fn missing_field(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let (field, rest) = rest.split_once('`')?;
    match rest
        .strip_prefix(" for key `")
        .and_then(|key| key.split_once('`'))
    {
        Some((parent, _)) => Some(format!("{}.{}", parent, field)),
        None => Some(field.to_string()),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_graphql_path() -> String {
    "/api/copilotkit".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    5000
}

fn default_response_timeout_ms() -> u64 {
    120_000
}
