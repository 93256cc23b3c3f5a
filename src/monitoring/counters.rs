//! Keyed monotonic tallies

use std::collections::HashMap;

#[derive(Debug, Clone)]
struct CounterEntry {
    count: u64,
    first_seen: u64,
}

/// A map of string keys to monotonically increasing counts.
///
/// Keys are created implicitly on first increment. `top_n` orders by count
/// descending with ties broken by first-seen order, so output is
/// deterministic regardless of map iteration order. Cardinality is unbounded;
/// callers bound it by keying on route templates rather than raw URLs.
#[derive(Debug, Clone, Default)]
pub struct CounterMap {
    entries: HashMap<String, CounterEntry>,
    next_seq: u64,
}

impl CounterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase the tally for `key` by 1
    pub fn increment(&mut self, key: &str) {
        match self.entries.get_mut(key) {
            Some(entry) => entry.count += 1,
            None => {
                let entry = CounterEntry {
                    count: 1,
                    first_seen: self.next_seq,
                };
                self.next_seq += 1;
                self.entries.insert(key.to_string(), entry);
            }
        }
    }

    /// Current tally for `key` (0 when never incremented)
    pub fn count(&self, key: &str) -> u64 {
        self.entries.get(key).map(|e| e.count).unwrap_or(0)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` highest-count keys with their counts, count descending,
    /// ties in first-seen order
    pub fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        let mut all: Vec<(&String, &CounterEntry)> = self.entries.iter().collect();
        all.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        all.into_iter()
            .take(n)
            .map(|(key, entry)| (key.clone(), entry.count))
            .collect()
    }
}
