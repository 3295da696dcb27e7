//! Shared-cache abstraction for the navigation engine.
//!
//! This crate provides the [`SharedCache`] trait that decouples the
//! resolver from the cross-process cache backend. The shared tier is the
//! coordination point between independent, stateless invocations: it holds
//! both serialized navigation trees and the version tokens that invalidate
//! them.
//!
//! Values are strings (serialized JSON in practice); TTLs are optional so
//! version tokens can live without expiry.
//!
//! # Implementations
//!
//! - [`NullSharedCache`]: No-op implementation (always misses)
//! - [`MemorySharedCache`]: In-process map with TTL expiry
//! - [`FileSharedCache`]: One file per key, for cross-process sharing on a
//!   single host
//!
//! # Example
//!
//! ```
//! use nav_cache::{MemorySharedCache, SharedCache};
//!
//! let cache = MemorySharedCache::new();
//! cache.set("nav:version:en", "3", None);
//! assert_eq!(cache.get("nav:version:en"), Some("3".to_owned()));
//! ```

mod file;
mod memory;

pub use file::FileSharedCache;
pub use memory::MemorySharedCache;

use std::time::Duration;

/// Key-value store shared between independent invocations.
///
/// All operations are best-effort: a failed write must not take down the
/// caller, and a `get` after a failed `set` simply misses. The cache is
/// always a derived, disposable projection — it is always correct to lose
/// every entry.
pub trait SharedCache: Send + Sync {
    /// Retrieve a value, `None` on miss or expiry.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value. `ttl = None` means the entry never expires.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>);

    /// Remove a value. Removing a missing key is a no-op.
    fn del(&self, key: &str);
}

/// No-op [`SharedCache`] that never stores or retrieves data.
///
/// Use when no shared tier is deployed; every read then rebuilds from the
/// row store (subject to the process-local tier).
pub struct NullSharedCache;

impl SharedCache for NullSharedCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) {}

    fn del(&self, _key: &str) {}
}
