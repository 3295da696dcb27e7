//! In-memory shared cache.
//!
//! [`MemorySharedCache`] backs the [`SharedCache`] trait with a process-wide
//! map. Useful for tests and single-process deployments; sharing it between
//! several resolvers in one process also models the cross-invocation shared
//! tier.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::SharedCache;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-process [`SharedCache`] with TTL expiry.
#[derive(Default)]
pub struct MemorySharedCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySharedCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SharedCache for MemorySharedCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();

        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if !entry.expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Entry expired; drop it so the map does not grow unbounded.
        self.entries.write().unwrap().remove(key);
        None
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let entry = Entry {
            value: value.to_owned(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.write().unwrap().insert(key.to_owned(), entry);
    }

    fn del(&self, key: &str) {
        self.entries.write().unwrap().remove(key);
    }
}
