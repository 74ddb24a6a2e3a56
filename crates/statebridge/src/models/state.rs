use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Conversation history and agent state for one thread.
///
/// Messages are opaque JSON: their schema belongs to the agent and the chat
/// widget, so they are passed through without being interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Value>,
    pub state: Map<String, Value>,
}

impl AgentState {
    pub fn new(messages: Vec<Value>, state: Map<String, Value>) -> Self {
        Self { messages, state }
    }

    /// The sentinel for "nothing to restore": returned for unknown threads and
    /// for every kind of fetch failure alike.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A thread exists once it has at least one message; `state` alone does not count.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
