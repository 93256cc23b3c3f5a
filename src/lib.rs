//! # fintrack-rs
//!
//! Backend for a personal finance tracker: a thin REST API for per-user
//! income/expense transactions, JWT authentication, and an in-process
//! request analytics subsystem exposed under `/api/monitoring`.
//!
//! Analytics live entirely in process memory and reset on restart; the
//! monitoring middleware records every request without adding I/O to the
//! request path.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use fintrack_rs::server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     server::run_server().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod monitoring;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use monitoring::AnalyticsCollector;
pub use utils::error::{AppError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, env!("CARGO_PKG_NAME"));
    }
}
