use crate::models::response::StateLoadResponse;
use crate::models::state::AgentState;

/// Shape fetched agent state into the `loadAgentState` result.
pub fn compose<S: Into<String>>(thread_id: S, agent_state: &AgentState) -> StateLoadResponse {
    let messages =
        serde_json::to_string(&agent_state.messages).unwrap_or_else(|_| "[]".to_string());
    let state = serde_json::to_string(&agent_state.state).unwrap_or_else(|_| "{}".to_string());

    StateLoadResponse {
        thread_id: thread_id.into(),
        thread_exists: !agent_state.is_empty(),
        messages,
        state,
    }
}
