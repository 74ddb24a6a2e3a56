pub mod agents;
pub mod classifier;
pub mod client;
pub mod composer;
pub mod errors;
pub mod models;
pub mod router;
pub mod runtime;

#[cfg(test)]
pub mod mock;
