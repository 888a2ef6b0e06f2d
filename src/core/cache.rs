use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct CacheEntry {
    pub value: serde_json::Value,
    pub ttl: Duration,
    pub created_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) <= self.ttl
    }
}

/// Response cache for the content API. Each entry carries its own
/// revalidation window.
pub struct TtlCache {
    max_entries: usize,
    entries: HashMap<String, CacheEntry>,
}

impl TtlCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<serde_json::Value> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<serde_json::Value> {
        self.entries.retain(|_, v| v.is_fresh(now));
        self.entries.get(key).map(|e| e.value.clone())
    }

    pub fn insert(&mut self, key: String, value: serde_json::Value, ttl: Duration) {
        self.insert_at(key, value, ttl, Instant::now())
    }

    pub fn insert_at(&mut self, key: String, value: serde_json::Value, ttl: Duration, now: Instant) {
        self.entries.retain(|_, v| v.is_fresh(now));
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            if let Some(victim) = self
                .entries
                .iter()
                .min_by_key(|(_, v)| v.created_at)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                ttl,
                created_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
