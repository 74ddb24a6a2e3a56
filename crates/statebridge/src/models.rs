//! Request-scoped values passed between the router, the fetch client and the
//! composer.
//!
//! Nothing here outlives a single request. Messages are kept exactly as the
//! external agent returned them on `/load_state`; the response types mirror
//! the GraphQL result the chat widget reads for `loadAgentState`.
pub mod response;
pub mod state;
