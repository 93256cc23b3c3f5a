//! Request analytics configuration

use crate::config::validation::Validate;
use serde::{Deserialize, Serialize};

/// Request analytics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// How many recent requests the global log retains
    #[serde(default = "default_recent_requests")]
    pub recent_requests_capacity: usize,
    /// How many recent errors the error log retains
    #[serde(default = "default_recent_errors")]
    pub recent_errors_capacity: usize,
    /// How many activities each user's log retains
    #[serde(default = "default_user_activity")]
    pub user_activity_capacity: usize,
    /// Key endpoint counters by the raw request path when no route template
    /// resolved. When disabled, unmatched requests share one counter key,
    /// which bounds counter cardinality under hostile traffic.
    #[serde(default = "default_true")]
    pub raw_path_fallback: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            recent_requests_capacity: default_recent_requests(),
            recent_errors_capacity: default_recent_errors(),
            user_activity_capacity: default_user_activity(),
            raw_path_fallback: true,
        }
    }
}

impl Validate for MonitoringConfig {
    fn validate(&self) -> Result<(), String> {
        if self.recent_requests_capacity == 0 {
            return Err("recent_requests_capacity must be greater than 0".to_string());
        }
        if self.recent_errors_capacity == 0 {
            return Err("recent_errors_capacity must be greater than 0".to_string());
        }
        if self.user_activity_capacity == 0 {
            return Err("user_activity_capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_recent_requests() -> usize {
    100
}

fn default_recent_errors() -> usize {
    50
}

fn default_user_activity() -> usize {
    20
}

fn default_true() -> bool {
    true
}
