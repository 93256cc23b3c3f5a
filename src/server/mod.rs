//! HTTP server: state, middleware, routes, and wiring

pub mod middleware;
pub mod routes;
mod server;
mod state;


pub use server::HttpServer;
pub use state::AppState;

use crate::config::Config;
use crate::utils::error::Result;

/// Load configuration and run the server until shutdown
pub async fn run_server() -> Result<()> {
    let config = Config::load().await?;
    let server = HttpServer::new(config)?;
    server.start().await
}
