//! In-process request analytics
//!
//! Every inbound request is recorded by [`AnalyticsCollector`] through the
//! monitoring middleware; the read side derives snapshots for the
//! `/api/monitoring` endpoints. All state lives in process memory and is
//! cleared on restart.

mod activity;
mod counters;
mod recorder;
mod reporter;
mod rolling_log;
mod system;
mod types;

#[cfg(test)]
mod tests;

pub use activity::{ActiveUserSet, UserActivityLog};
pub use counters::CounterMap;
pub use recorder::AnalyticsCollector;
pub use reporter::{
    AnalyticsReport, CpuUsage, LiveStats, MemoryUsage, PerformanceStats, RequestStats, ServerInfo,
    UserActivityReport, UserActivitySummary, UserStats,
};
pub use rolling_log::RollingLog;
pub use types::{ANONYMOUS_USER, ErrorRecord, RequestMeta, RequestRecord, ResponseMeta, UserActivity};
