//! Per-user activity tracking

use super::rolling_log::RollingLog;
use super::types::UserActivity;
use std::collections::{HashMap, HashSet};

/// Set of user identities observed since the last reset.
///
/// Membership only grows; a user who disconnects stays counted until reset.
/// Sessions are not tracked.
#[derive(Debug, Clone, Default)]
pub struct ActiveUserSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ActiveUserSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `user_id` to the set; idempotent
    pub fn record(&mut self, user_id: &str) {
        if self.seen.insert(user_id.to_string()) {
            self.order.push(user_id.to_string());
        }
    }

    /// Number of distinct users seen
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.seen.contains(user_id)
    }

    /// Up to `n` user ids in first-seen order
    pub fn sample(&self, n: usize) -> Vec<String> {
        self.order.iter().take(n).cloned().collect()
    }
}

/// Bounded per-user activity history.
///
/// Each user's log is created lazily on first activity and capped at
/// `capacity` entries; the running total per user counts every recorded
/// activity, evicted or not.
#[derive(Debug, Clone)]
pub struct UserActivityLog {
    per_user: HashMap<String, RollingLog<UserActivity>>,
    capacity: usize,
}

impl UserActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            per_user: HashMap::new(),
            capacity,
        }
    }

    /// Append `activity` to the user's log
    pub fn record(&mut self, user_id: &str, activity: UserActivity) {
        self.per_user
            .entry(user_id.to_string())
            .or_insert_with(|| RollingLog::new(self.capacity))
            .push(activity);
    }

    /// The user's `n` most recent activities, most-recent-first
    pub fn activities_for(&self, user_id: &str, n: usize) -> Vec<UserActivity> {
        self.per_user
            .get(user_id)
            .map(|log| log.snapshot(n))
            .unwrap_or_default()
    }

    /// Total activities ever recorded for the user, including evicted ones
    pub fn total_for(&self, user_id: &str) -> u64 {
        self.per_user
            .get(user_id)
            .map(|log| log.total_pushed())
            .unwrap_or(0)
    }

    /// Number of users with recorded activity
    pub fn user_count(&self) -> usize {
        self.per_user.len()
    }

    /// Iterate over (user id, activity log) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RollingLog<UserActivity>)> {
        self.per_user.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn activity(user_id: &str, endpoint: &str) -> UserActivity {
        UserActivity {
            user_id: user_id.to_string(),
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            timestamp: Utc::now(),
            remote_address: "127.0.0.1".to_string(),
        }
    }

    #[test]
    fn test_active_user_set_idempotent() {
        let mut set = ActiveUserSet::new();
        set.record("u1");
        set.record("u1");
        set.record("u2");
        assert_eq!(set.len(), 2);
        assert!(set.contains("u1"));
        assert_eq!(set.sample(10), vec!["u1".to_string(), "u2".to_string()]);
    }

    #[test]
    fn test_active_user_set_sample_bounded() {
        let mut set = ActiveUserSet::new();
        for i in 0..15 {
            set.record(&format!("u{}", i));
        }
        assert_eq!(set.sample(10).len(), 10);
        assert_eq!(set.len(), 15);
    }

    #[test]
    fn test_per_user_cap_with_running_total() {
        // 25 activities against a cap of 20: log holds the most recent 20,
        // the running total still reports 25
        let mut log = UserActivityLog::new(20);
        for i in 0..25 {
            log.record("u1", activity("u1", &format!("/t/{}", i)));
        }
        let recent = log.activities_for("u1", 100);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].endpoint, "/t/24");
        assert_eq!(recent[19].endpoint, "/t/5");
        assert_eq!(log.total_for("u1"), 25);
    }

    #[test]
    fn test_unknown_user_is_empty() {
        let log = UserActivityLog::new(20);
        assert!(log.activities_for("ghost", 10).is_empty());
        assert_eq!(log.total_for("ghost"), 0);
        assert_eq!(log.user_count(), 0);
    }

    #[test]
    fn test_logs_are_per_user() {
        let mut log = UserActivityLog::new(20);
        log.record("u1", activity("u1", "/a"));
        log.record("u2", activity("u2", "/b"));
        assert_eq!(log.user_count(), 2);
        assert_eq!(log.activities_for("u1", 10).len(), 1);
        assert_eq!(log.activities_for("u1", 10)[0].endpoint, "/a");
    }
}
