//! Tests for the request analytics subsystem

use super::recorder::AnalyticsCollector;
use super::types::{RequestMeta, ResponseMeta};
use crate::config::MonitoringConfig;
use std::sync::Arc;

fn meta(method: &str, path: &str, ip: &str, user: Option<&str>) -> RequestMeta {
    RequestMeta {
        method: method.to_string(),
        path: path.to_string(),
        remote_addr: Some(ip.to_string()),
        user_agent: Some("test-agent".to_string()),
        user_id: user.map(|u| u.to_string()),
    }
}

fn completion(status_code: u16, duration_ms: u64) -> ResponseMeta {
    ResponseMeta {
        status_code,
        duration_ms,
        response_size_bytes: None,
        error_detail: None,
    }
}

fn collector() -> AnalyticsCollector {
    AnalyticsCollector::new(&MonitoringConfig::default())
}

#[test]
fn test_concurrent_recording_loses_no_updates() {
    let collector = Arc::new(collector());
    let threads = 8;
    let per_thread = 50;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let collector = Arc::clone(&collector);
            std::thread::spawn(move || {
                for _ in 0..per_thread {
                    let record =
                        collector.on_start(meta("GET", "/transactions", "1.2.3.4", None));
                    collector.on_complete(&record, completion(200, 1));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let report = collector.analytics_report();
    let expected = (threads * per_thread) as u64;
    assert_eq!(report.requests.total, expected);
    assert_eq!(
        report.top_endpoints,
        vec![("GET /transactions".to_string(), expected)]
    );
}

#[test]
fn test_total_requests_independent_of_key_cardinality() {
    let collector = collector();
    for i in 0..30 {
        collector.on_start(meta(
            "GET",
            &format!("/route/{}", i % 7),
            &format!("10.0.0.{}", i % 3),
            None,
        ));
    }
    assert_eq!(collector.total_requests(), 30);
    let report = collector.analytics_report();
    let dimensional: u64 = report.top_endpoints.iter().map(|(_, count)| count).sum();
    assert_eq!(dimensional, 30);
}

#[test]
fn test_error_rate_from_running_totals() {
    let collector = collector();
    assert_eq!(collector.analytics_report().requests.error_rate, 0.0);

    for i in 0..4 {
        let record = collector.on_start(meta("GET", "/transactions", "1.2.3.4", None));
        let status = if i == 0 { 500 } else { 200 };
        collector.on_complete(&record, completion(status, 5));
    }

    let report = collector.analytics_report();
    assert_eq!(report.requests.total, 4);
    assert_eq!(report.requests.error_rate, 0.25);
}

#[test]
fn test_error_rate_survives_error_log_eviction() {
    // 60 failures against an error log capped at 50: the log holds 50,
    // the rate still reflects all 60
    let config = MonitoringConfig {
        recent_requests_capacity: 200,
        recent_errors_capacity: 50,
        ..MonitoringConfig::default()
    };
    let collector = AnalyticsCollector::new(&config);
    for _ in 0..60 {
        let record = collector.on_start(meta("GET", "/boom", "1.2.3.4", None));
        collector.on_complete(&record, completion(500, 2));
    }

    let report = collector.analytics_report();
    assert_eq!(report.requests.error_rate, 1.0);
    assert_eq!(report.recent_errors.len(), 10);
    assert_eq!(collector.live_stats().recent_errors.len(), 3);
}

#[test]
fn test_reset_discards_everything() {
    let collector = collector();
    for _ in 0..5 {
        let record = collector.on_start(meta("GET", "/transactions", "1.2.3.4", Some("u1")));
        collector.on_complete(&record, completion(500, 3));
    }
    assert_eq!(collector.total_requests(), 5);

    collector.reset();

    let report = collector.analytics_report();
    assert_eq!(report.requests.total, 0);
    assert_eq!(report.requests.error_rate, 0.0);
    assert!(report.top_endpoints.is_empty());
    assert!(report.top_ips.is_empty());
    assert_eq!(report.users.active_users_count, 0);
    assert!(report.recent_requests.is_empty());
    assert!(report.recent_errors.is_empty());
    assert!(report.server.uptime_seconds < 2);
    assert!(collector.uptime().as_secs() < 2);
}

#[test]
fn test_missing_completion_is_tolerated() {
    let collector = collector();
    collector.on_start(meta("GET", "/slow", "1.2.3.4", None));

    let report = collector.analytics_report();
    assert_eq!(report.recent_requests.len(), 1);
    let record = &report.recent_requests[0];
    assert!(record.status_code.is_none());
    assert!(record.duration_ms.is_none());
    assert!(report.recent_errors.is_empty());
    assert_eq!(report.requests.error_rate, 0.0);
}

#[test]
fn test_repeat_completion_does_not_double_count() {
    let collector = collector();
    let record = collector.on_start(meta("GET", "/boom", "1.2.3.4", None));
    collector.on_complete(&record, completion(500, 3));
    collector.on_complete(&record, completion(500, 3));

    let report = collector.analytics_report();
    assert_eq!(report.recent_errors.len(), 1);
    assert_eq!(report.requests.error_rate, 1.0);
}

#[test]
fn test_completion_after_eviction_still_counts_errors() {
    let config = MonitoringConfig {
        recent_requests_capacity: 2,
        ..MonitoringConfig::default()
    };
    let collector = AnalyticsCollector::new(&config);

    let first = collector.on_start(meta("GET", "/a", "1.2.3.4", None));
    collector.on_start(meta("GET", "/b", "1.2.3.4", None));
    collector.on_start(meta("GET", "/c", "1.2.3.4", None));

    // `first` has been evicted from the request log by now
    collector.on_complete(&first, completion(500, 9));

    let report = collector.analytics_report();
    assert_eq!(report.recent_errors.len(), 1);
    assert_eq!(report.recent_errors[0].request.path, "/a");
    assert_eq!(report.requests.error_rate, 1.0 / 3.0);
}

#[test]
fn test_anonymous_requests_do_not_touch_user_state() {
    let collector = collector();
    collector.on_start(meta("GET", "/transactions", "1.2.3.4", None));

    let report = collector.analytics_report();
    assert_eq!(report.users.active_users_count, 0);
    assert!(report.users.recent_activities.is_empty());
    assert_eq!(collector.user_activity_report().total_active_users, 0);
}

#[test]
fn test_degraded_metadata_gets_defaults() {
    let collector = collector();
    let record = collector.on_start(RequestMeta {
        method: "GET".to_string(),
        path: "/x".to_string(),
        remote_addr: None,
        user_agent: None,
        user_id: None,
    });
    assert_eq!(record.remote_address, "unknown");
    assert_eq!(record.user_id, "anonymous");

    let report = collector.analytics_report();
    assert_eq!(report.top_ips, vec![("unknown".to_string(), 1)]);
}

#[test]
fn test_user_activity_report_shape() {
    let collector = collector();
    for i in 0..12 {
        let record = collector.on_start(meta(
            "GET",
            &format!("/transactions/{}", i % 3),
            "1.2.3.4",
            Some("u1"),
        ));
        collector.on_complete(&record, completion(200, 4));
    }

    let report = collector.user_activity_report();
    assert_eq!(report.total_active_users, 1);
    let summary = &report.users[0];
    assert_eq!(summary.user_id, "u1");
    assert_eq!(summary.total_activities, 12);
    assert_eq!(summary.activities.len(), 10);
    assert!(summary.last_activity.is_some());
    // 3 distinct endpoints among the 10 most recent activities
    assert_eq!(summary.recent_endpoints.len(), 3);
}

#[test]
fn test_end_to_end_scenario() {
    let collector = collector();
    collector.reset();

    let record = collector.on_start(meta("GET", "/transactions", "1.2.3.4", Some("u1")));
    collector.on_complete(&record, completion(200, 15));

    let report = collector.analytics_report();
    assert_eq!(report.requests.total, 1);
    assert_eq!(report.requests.error_rate, 0.0);
    assert_eq!(
        report.top_endpoints,
        vec![("GET /transactions".to_string(), 1)]
    );
    assert_eq!(report.top_ips, vec![("1.2.3.4".to_string(), 1)]);
    assert_eq!(report.users.active_users_count, 1);
    assert_eq!(report.users.active_user_ids, vec!["u1".to_string()]);
    assert_eq!(report.recent_requests.len(), 1);
    assert_eq!(report.recent_requests[0].status_code, Some(200));
    assert_eq!(report.recent_requests[0].duration_ms, Some(15));

    // Same flow again from scratch, this time failing
    collector.reset();
    let record = collector.on_start(meta("GET", "/transactions", "1.2.3.4", Some("u1")));
    collector.on_complete(&record, completion(500, 15));

    let report = collector.analytics_report();
    assert_eq!(report.requests.total, 1);
    assert_eq!(report.requests.error_rate, 1.0);
    assert_eq!(report.recent_errors.len(), 1);
    assert_eq!(report.recent_errors[0].error, "Internal Server Error");
}

#[test]
fn test_report_serializes_with_wire_field_names() {
    let collector = collector();
    let record = collector.on_start(meta("GET", "/transactions", "1.2.3.4", Some("u1")));
    collector.on_complete(&record, completion(200, 1));

    let value = serde_json::to_value(collector.analytics_report()).unwrap();
    assert_eq!(value["server"]["status"], "running");
    assert!(value["requests"]["errorRate"].is_number());
    assert!(value["users"]["activeUsersCount"].is_number());
    assert!(value["topEndpoints"].is_array());
    assert!(value["topIPs"].is_array());
    assert!(value["performance"]["memoryUsage"]["rss"].is_number());
    assert_eq!(value["recentRequests"][0]["userId"], "u1");
}
