//! Record types and lifecycle hook inputs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// User id recorded when the auth collaborator supplied no identity
pub const ANONYMOUS_USER: &str = "anonymous";

/// Inputs captured at request start by the transport layer
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// HTTP method
    pub method: String,
    /// Route template, or raw path depending on the fallback setting
    pub path: String,
    /// Peer address, if the transport could resolve one
    pub remote_addr: Option<String>,
    /// User-Agent header value
    pub user_agent: Option<String>,
    /// Authenticated user id, if any
    pub user_id: Option<String>,
}

/// Inputs captured when the response is finalized
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// Response status code
    pub status_code: u16,
    /// Elapsed handler time in milliseconds
    pub duration_ms: u64,
    /// Content-Length of the response, when known
    pub response_size_bytes: Option<u64>,
    /// Handler-supplied error description for failed requests
    pub error_detail: Option<String>,
}

/// One inbound request. Completion fields stay absent until the response
/// finishes and are written exactly once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// Request-scoped token, unique within the process lifetime
    pub id: String,
    pub method: String,
    pub path: String,
    pub remote_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_size_bytes: Option<u64>,
}

impl RequestRecord {
    /// Whether the completion hook has run for this record
    pub fn is_completed(&self) -> bool {
        self.status_code.is_some()
    }
}

/// A failed request (status >= 400) retained in the error log
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    #[serde(flatten)]
    pub request: RequestRecord,
    /// Free-form failure description
    pub error: String,
}

/// One user action, retained in that user's bounded activity log
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub user_id: String,
    pub endpoint: String,
    pub method: String,
    pub timestamp: DateTime<Utc>,
    pub remote_address: String,
}
