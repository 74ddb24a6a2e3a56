use serde_json::Value;

pub const LOAD_AGENT_STATE: &str = "loadAgentState";

/// Identifiers pulled from a `loadAgentState` request. Either may be absent;
/// the router answers those requests with an empty thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateLoadQuery {
    pub thread_id: Option<String>,
    pub agent_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    StateLoad(StateLoadQuery),
    Passthrough,
}

/// Decide whether a GraphQL request payload is the state-load operation.
pub fn classify(payload: &Value) -> Classification {
    let operation = payload.get("operationName").and_then(Value::as_str);
    if operation != Some(LOAD_AGENT_STATE) {
        return Classification::Passthrough;
    }

    let data = payload.get("variables").and_then(|v| v.get("data"));
    let field = |name: &str| {
        data.and_then(|d| d.get(name))
            .and_then(Value::as_str)
            .map(String::from)
    };

    Classification::StateLoad(StateLoadQuery {
        thread_id: field("threadId"),
        agent_name: field("agentName"),
    })
}
