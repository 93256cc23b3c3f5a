//! Read-side snapshot derivation
//!
//! Every function here copies state out under the read lock and never
//! mutates it. Snapshots are always fully populated; zero traffic renders as
//! zero-valued fields.

use super::recorder::AnalyticsCollector;
use super::system;
use super::types::{ErrorRecord, RequestRecord, UserActivity};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Limits reproduced from the service's wire contract
const TOP_N: usize = 10;
const REPORT_RECENT_REQUESTS: usize = 20;
const REPORT_RECENT_ERRORS: usize = 10;
const REPORT_USER_SAMPLE: usize = 10;
const REPORT_RECENT_ACTIVITIES: usize = 20;
const ACTIVITIES_PER_USER_IN_FEED: usize = 5;
const LIVE_RECENT_REQUESTS: usize = 5;
const LIVE_RECENT_ERRORS: usize = 3;
const SUMMARY_RECENT_ENDPOINTS: usize = 10;
const SUMMARY_ACTIVITIES: usize = 10;

/// Full analytics snapshot served by `GET /api/monitoring/analytics`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub server: ServerInfo,
    pub requests: RequestStats,
    pub users: UserStats,
    pub top_endpoints: Vec<(String, u64)>,
    #[serde(rename = "topIPs")]
    pub top_ips: Vec<(String, u64)>,
    pub recent_requests: Vec<RequestRecord>,
    pub recent_errors: Vec<ErrorRecord>,
    pub performance: PerformanceStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub start_time: DateTime<Utc>,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStats {
    pub total: u64,
    /// Failed fraction of all requests this window, from running totals
    pub error_rate: f64,
    pub average_per_minute: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub active_users_count: usize,
    pub active_user_ids: Vec<String>,
    pub recent_activities: Vec<UserActivity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub memory_usage: MemoryUsage,
    pub cpu_usage: CpuUsage,
}

/// Process memory, in bytes
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub rss: u64,
    pub virtual_memory: u64,
}

/// Process CPU load
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    pub percent: f64,
}

/// Compact snapshot served by `GET /api/monitoring/live`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStats {
    pub timestamp: DateTime<Utc>,
    pub total_requests: u64,
    pub active_users: usize,
    pub recent_requests: Vec<RequestRecord>,
    pub recent_errors: Vec<ErrorRecord>,
    pub memory_usage: MemoryUsage,
}

/// Per-user rollup served by `GET /api/monitoring/user-activity`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivityReport {
    pub total_active_users: usize,
    pub users: Vec<UserActivitySummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivitySummary {
    pub user_id: String,
    /// Every activity ever recorded for the user, not just the retained ones
    pub total_activities: u64,
    pub last_activity: Option<DateTime<Utc>>,
    pub recent_endpoints: Vec<String>,
    pub activities: Vec<UserActivity>,
}

impl AnalyticsCollector {
    /// Derive the full analytics snapshot
    pub fn analytics_report(&self) -> AnalyticsReport {
        // Process stats come from the OS; gather them before taking the lock
        let (memory_usage, cpu_usage) = system::process_usage();

        let storage = self.storage.read();
        let uptime = storage.epoch_instant.elapsed();
        let total = storage.total_requests;

        let error_rate = if total == 0 {
            0.0
        } else {
            storage.total_errors as f64 / total as f64
        };

        let uptime_ms = uptime.as_millis() as f64;
        let average_per_minute = if uptime_ms == 0.0 {
            0.0
        } else {
            round2(total as f64 / (uptime_ms / 60_000.0))
        };

        let mut recent_activities: Vec<UserActivity> = storage
            .user_activity
            .iter()
            .flat_map(|(_, log)| log.snapshot(ACTIVITIES_PER_USER_IN_FEED))
            .collect();
        recent_activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent_activities.truncate(REPORT_RECENT_ACTIVITIES);

        AnalyticsReport {
            server: ServerInfo {
                status: "running",
                uptime_seconds: uptime.as_secs(),
                start_time: storage.epoch,
                version: env!("CARGO_PKG_VERSION"),
            },
            requests: RequestStats {
                total,
                error_rate,
                average_per_minute,
            },
            users: UserStats {
                active_users_count: storage.active_users.len(),
                active_user_ids: storage.active_users.sample(REPORT_USER_SAMPLE),
                recent_activities,
            },
            top_endpoints: storage.endpoints.top_n(TOP_N),
            top_ips: storage.ips.top_n(TOP_N),
            recent_requests: storage.recent_requests.snapshot(REPORT_RECENT_REQUESTS),
            recent_errors: storage.recent_errors.snapshot(REPORT_RECENT_ERRORS),
            performance: PerformanceStats {
                memory_usage,
                cpu_usage,
            },
        }
    }

    /// Derive the compact live snapshot
    pub fn live_stats(&self) -> LiveStats {
        let (memory_usage, _) = system::process_usage();

        let storage = self.storage.read();
        LiveStats {
            timestamp: Utc::now(),
            total_requests: storage.total_requests,
            active_users: storage.active_users.len(),
            recent_requests: storage.recent_requests.snapshot(LIVE_RECENT_REQUESTS),
            recent_errors: storage.recent_errors.snapshot(LIVE_RECENT_ERRORS),
            memory_usage,
        }
    }

    /// Derive the per-user activity rollup
    pub fn user_activity_report(&self) -> UserActivityReport {
        let storage = self.storage.read();

        let mut users: Vec<UserActivitySummary> = storage
            .user_activity
            .iter()
            .map(|(user_id, log)| {
                let activities = log.snapshot(SUMMARY_ACTIVITIES);
                let mut recent_endpoints: Vec<String> = Vec::new();
                for activity in &activities {
                    if !recent_endpoints.contains(&activity.endpoint) {
                        recent_endpoints.push(activity.endpoint.clone());
                    }
                    if recent_endpoints.len() == SUMMARY_RECENT_ENDPOINTS {
                        break;
                    }
                }
                UserActivitySummary {
                    user_id: user_id.clone(),
                    total_activities: log.total_pushed(),
                    last_activity: activities.first().map(|a| a.timestamp),
                    recent_endpoints,
                    activities,
                }
            })
            .collect();

        users.sort_by(|a, b| {
            b.last_activity
                .cmp(&a.last_activity)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        UserActivityReport {
            total_active_users: users.len(),
            users,
        }
    }

    /// Total requests this window
    pub fn total_requests(&self) -> u64 {
        self.storage.read().total_requests
    }

    /// Distinct authenticated users this window
    pub fn active_user_count(&self) -> usize {
        self.storage.read().active_users.len()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
