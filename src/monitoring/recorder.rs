//! Request lifecycle recording

use super::activity::{ActiveUserSet, UserActivityLog};
use super::counters::CounterMap;
use super::rolling_log::RollingLog;
use super::types::{
    ANONYMOUS_USER, ErrorRecord, RequestMeta, RequestRecord, ResponseMeta, UserActivity,
};
use crate::config::MonitoringConfig;
use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Everything the analytics subsystem accumulates, behind one lock.
///
/// A single consolidated struct keeps every mutation a single critical
/// section and lets `reset` swap the whole value at once.
#[derive(Debug)]
pub(super) struct AnalyticsStorage {
    /// Start of the current accumulation window
    pub(super) epoch: DateTime<Utc>,
    pub(super) epoch_instant: Instant,
    pub(super) total_requests: u64,
    /// Running error count; unlike the error log, never capped
    pub(super) total_errors: u64,
    pub(super) endpoints: CounterMap,
    pub(super) ips: CounterMap,
    pub(super) user_agents: CounterMap,
    pub(super) active_users: ActiveUserSet,
    pub(super) recent_requests: RollingLog<RequestRecord>,
    pub(super) recent_errors: RollingLog<ErrorRecord>,
    pub(super) user_activity: UserActivityLog,
}

impl AnalyticsStorage {
    fn new(config: &MonitoringConfig) -> Self {
        Self {
            epoch: Utc::now(),
            epoch_instant: Instant::now(),
            total_requests: 0,
            total_errors: 0,
            endpoints: CounterMap::new(),
            ips: CounterMap::new(),
            user_agents: CounterMap::new(),
            active_users: ActiveUserSet::new(),
            recent_requests: RollingLog::new(config.recent_requests_capacity),
            recent_errors: RollingLog::new(config.recent_errors_capacity),
            user_activity: UserActivityLog::new(config.user_activity_capacity),
        }
    }
}

/// Records every request passing through the service and answers the
/// analytics read endpoints.
///
/// `on_start`/`on_complete` are the transport layer's lifecycle hooks. Both
/// are infallible: malformed metadata degrades to defaults and never
/// interferes with the request being instrumented. Neither performs I/O
/// inside the critical section.
#[derive(Debug)]
pub struct AnalyticsCollector {
    pub(super) storage: Arc<RwLock<AnalyticsStorage>>,
    config: MonitoringConfig,
}

impl AnalyticsCollector {
    pub fn new(config: &MonitoringConfig) -> Self {
        Self {
            storage: Arc::new(RwLock::new(AnalyticsStorage::new(config))),
            config: config.clone(),
        }
    }

    /// Record a request at the moment it arrives.
    ///
    /// Returns the started record; the caller hands it back to
    /// [`on_complete`](Self::on_complete) when the response is finalized.
    pub fn on_start(&self, meta: RequestMeta) -> RequestRecord {
        let record = RequestRecord {
            id: Uuid::new_v4().to_string(),
            method: meta.method,
            path: meta.path,
            remote_address: meta
                .remote_addr
                .unwrap_or_else(|| "unknown".to_string()),
            user_agent: meta.user_agent,
            user_id: meta.user_id.unwrap_or_else(|| ANONYMOUS_USER.to_string()),
            started_at: Utc::now(),
            status_code: None,
            duration_ms: None,
            response_size_bytes: None,
        };

        {
            let mut storage = self.storage.write();
            storage.total_requests += 1;
            storage
                .endpoints
                .increment(&format!("{} {}", record.method, record.path));
            storage.ips.increment(&record.remote_address);
            if let Some(agent) = &record.user_agent {
                storage.user_agents.increment(agent);
            }
            if record.user_id != ANONYMOUS_USER {
                storage.active_users.record(&record.user_id);
                storage.user_activity.record(
                    &record.user_id,
                    UserActivity {
                        user_id: record.user_id.clone(),
                        endpoint: record.path.clone(),
                        method: record.method.clone(),
                        timestamp: record.started_at,
                        remote_address: record.remote_address.clone(),
                    },
                );
            }
            storage.recent_requests.push(record.clone());
        }

        info!(
            "{} {} - IP: {} - User: {}",
            record.method, record.path, record.remote_address, record.user_id
        );

        record
    }

    /// Attach completion data to a started record.
    ///
    /// Fields are written once; a repeat call overwrites them but does not
    /// double-count errors. A record already evicted from the request log
    /// still feeds the error log and running totals.
    pub fn on_complete(&self, record: &RequestRecord, completion: ResponseMeta) {
        let failed = completion.status_code >= 400;

        {
            let mut storage = self.storage.write();

            let mut already_completed = false;
            let mut completed = record.clone();
            if let Some(entry) = storage
                .recent_requests
                .iter_mut()
                .find(|r| r.id == record.id)
            {
                already_completed = entry.is_completed();
                entry.status_code = Some(completion.status_code);
                entry.duration_ms = Some(completion.duration_ms);
                entry.response_size_bytes = completion.response_size_bytes;
                completed = entry.clone();
            } else {
                completed.status_code = Some(completion.status_code);
                completed.duration_ms = Some(completion.duration_ms);
                completed.response_size_bytes = completion.response_size_bytes;
            }

            if failed && !already_completed {
                storage.total_errors += 1;
                storage.recent_errors.push(ErrorRecord {
                    request: completed,
                    error: completion
                        .error_detail
                        .clone()
                        .unwrap_or_else(|| default_error_detail(completion.status_code)),
                });
            }
        }

        info!(
            "[{}] {} - {}ms",
            record.id, completion.status_code, completion.duration_ms
        );
    }

    /// Discard all accumulated state and start a fresh window.
    ///
    /// The whole storage value is replaced under the write lock, so no
    /// reader observes a mixture of old and new state and no concurrent
    /// recording lands across the boundary.
    pub fn reset(&self) {
        let mut storage = self.storage.write();
        *storage = AnalyticsStorage::new(&self.config);
    }

    /// Start of the current accumulation window
    pub fn epoch(&self) -> DateTime<Utc> {
        self.storage.read().epoch
    }

    /// Time elapsed since the current window began
    pub fn uptime(&self) -> std::time::Duration {
        self.storage.read().epoch_instant.elapsed()
    }
}

fn default_error_detail(status_code: u16) -> String {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string()
}
