//! Application state shared across HTTP handlers

use crate::auth::AuthSystem;
use crate::config::Config;
use crate::monitoring::AnalyticsCollector;
use crate::storage::{TransactionStore, UserStore};
use std::sync::Arc;

/// Shared resources handed to every handler via `web::Data`.
///
/// The analytics collector is constructed here, at the composition root,
/// and injected everywhere it is needed; nothing reaches it through globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthSystem>,
    pub transactions: Arc<TransactionStore>,
    pub analytics: Arc<AnalyticsCollector>,
}

impl AppState {
    /// Build the full state from configuration
    pub fn new(config: Config) -> Self {
        let users = Arc::new(UserStore::new());
        let auth = Arc::new(AuthSystem::new(&config.auth, users));
        let analytics = Arc::new(AnalyticsCollector::new(&config.monitoring));

        Self {
            config: Arc::new(config),
            auth,
            transactions: Arc::new(TransactionStore::new()),
            analytics,
        }
    }
}
