pub mod configuration;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;
