//! Configuration model types

mod auth;
mod monitoring;
mod server;

pub use auth::AuthConfig;
pub use monitoring::MonitoringConfig;
pub use server::{CorsConfig, ServerConfig};
