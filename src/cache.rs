use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::num::NonZeroUsize;

// Cache entry with timestamp
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub url: String,
    pub created_at: DateTime<Utc>,
}

// Create a cache key (style + raw prompt, not hashed)
// A prompt containing `_` can alias another pair: "a_b"+"c" vs "a"+"b_c"
pub fn make_cache_key(style: &str, prompt: &str) -> String {
    format!("{}_{}", style, prompt)
}

// Store for generated image URLs
pub trait ImageStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn insert(&self, key: String, url: String);

    // returns how many entries were dropped
    fn clear(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// In-process store, unbounded unless a capacity is given
pub struct MemoryStore {
    entries: DashMap<String, CacheEntry>,
    capacity: Option<NonZeroUsize>,
}

impl MemoryStore {
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.created_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            tracing::debug!(key = %key, "evicted oldest cache entry");
        }
    }
}

impl ImageStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.url.clone())
    }

    fn insert(&self, key: String, url: String) {
        if let Some(capacity) = self.capacity {
            if !self.entries.contains_key(&key) && self.entries.len() >= capacity.get() {
                self.evict_oldest();
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                url,
                created_at: Utc::now(),
            },
        );
    }

    fn clear(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, _| {
            removed += 1;
            false
        });
        removed
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
