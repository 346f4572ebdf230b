pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod routes;
pub mod session;
pub mod settings;
pub mod state;
pub mod types;
