use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The `loadAgentState` result object. `messages` and `state` are JSON encoded
/// strings because that is how the runtime's schema declares them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateLoadResponse {
    pub thread_id: String,
    pub thread_exists: bool,
    pub messages: String,
    pub state: String,
}

impl StateLoadResponse {
    /// Answer for a thread with nothing to restore.
    pub fn not_found<S: Into<String>>(thread_id: S) -> Self {
        Self {
            thread_id: thread_id.into(),
            thread_exists: false,
            messages: "[]".to_string(),
            state: "{}".to_string(),
        }
    }

    /// Wrap as a GraphQL execution result.
    pub fn into_graphql(self) -> Value {
        json!({
            "data": {
                "loadAgentState": self
            }
        })
    }
}
