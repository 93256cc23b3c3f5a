//! HTTP middleware implementations
//!
//! - Bearer-token identity resolution
//! - Request analytics recording

mod auth;
mod monitor;

#[cfg(test)]
mod tests;

pub use auth::{AuthMiddleware, AuthMiddlewareService};
pub use monitor::{MonitorMiddleware, MonitorMiddlewareService};
