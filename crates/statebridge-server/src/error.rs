use statebridge::errors::BridgeError;
use thiserror::Error;

pub const ENV_PREFIX: &str = "STATEBRIDGE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration, set {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("No agents configured, set at least one STATEBRIDGE_AGENTS__<NAME>=<url>")]
    NoAgents,

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("Invalid runtime URL {url}: {source}")]
    InvalidRuntimeUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Invalid GraphQL path {0}, it must start with '/'")]
    InvalidGraphqlPath(String),

    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a dotted configuration key to the environment variable that sets it,
/// e.g. `runtime.url` to `STATEBRIDGE_RUNTIME__URL`.
pub fn to_env_var(field_path: &str) -> String {
    let key = field_path
        .split('.')
        .filter(|part| !part.is_empty())
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("__");
    format!("{}_{}", ENV_PREFIX, key)
}
