//! Two-tier versioned cache.
//!
//! Resolved trees are cached in a process-local map and in the shared
//! cache, keyed by `(prefix, version, locale, role)`. The version token is
//! the sole coordination primitive between independent invocations: it is
//! a per-locale counter persisted in the shared store. Invalidation bumps
//! the token and clears the local tier; every invocation that later reads
//! the new token constructs keys under which nothing is cached, forcing a
//! rebuild — no per-role key ever has to be enumerated or deleted.
//!
//! The local tier carries a short TTL so entries self-expire even without
//! a version bump; the shared tier's longer TTL is a memory bound, not the
//! invalidation mechanism.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use nav_cache::SharedCache;

use crate::node::NavigationTree;

struct LocalEntry {
    version: String,
    expires_at: Instant,
    tree: Arc<NavigationTree>,
}

/// Two-tier cache for resolved navigation trees.
pub(crate) struct VersionedCache {
    shared: Arc<dyn SharedCache>,
    local: RwLock<HashMap<String, LocalEntry>>,
    prefix: String,
    local_ttl: Duration,
    shared_ttl: Duration,
}

impl VersionedCache {
    pub(crate) fn new(
        shared: Arc<dyn SharedCache>,
        prefix: String,
        local_ttl: Duration,
        shared_ttl: Duration,
    ) -> Self {
        Self {
            shared,
            local: RwLock::new(HashMap::new()),
            prefix,
            local_ttl,
            shared_ttl,
        }
    }

    fn version_key(&self, locale: &str) -> String {
        format!("{}:version:{}", self.prefix, locale)
    }

    /// Current version token for a locale. Absence reads as "1" so keys
    /// are stable before the first invalidation ever happens.
    fn current_version(&self, locale: &str) -> String {
        self.shared
            .get(&self.version_key(locale))
            .unwrap_or_else(|| "1".to_owned())
    }

    fn entry_key(&self, version: &str, locale: &str, role: Option<&str>) -> String {
        format!(
            "{}:{}:{}:{}",
            self.prefix,
            version,
            locale,
            role.unwrap_or("-")
        )
    }

    fn local_key(locale: &str, role: Option<&str>) -> String {
        format!("{}:{}", locale, role.unwrap_or("-"))
    }

    /// Look up a tree, local tier first.
    pub(crate) fn get(&self, locale: &str, role: Option<&str>) -> Option<Arc<NavigationTree>> {
        let version = self.current_version(locale);

        if let Some(entry) = self.local.read().unwrap().get(&Self::local_key(locale, role))
            && entry.version == version
            && Instant::now() < entry.expires_at
        {
            tracing::debug!(locale, "navigation cache hit (local)");
            return Some(Arc::clone(&entry.tree));
        }

        let key = self.entry_key(&version, locale, role);
        let raw = self.shared.get(&key)?;
        match serde_json::from_str::<NavigationTree>(&raw) {
            Ok(tree) => {
                tracing::debug!(locale, "navigation cache hit (shared)");
                let tree = Arc::new(tree);
                self.store_local(locale, role, version, &tree);
                Some(tree)
            }
            Err(e) => {
                tracing::debug!(error = %e, key, "dropping corrupt shared cache entry");
                self.shared.del(&key);
                None
            }
        }
    }

    /// Look up a tree in the local tier ignoring version and TTL.
    ///
    /// Used only when a caller explicitly opts into serving stale data
    /// after a failed rebuild.
    pub(crate) fn get_stale(&self, locale: &str, role: Option<&str>) -> Option<Arc<NavigationTree>> {
        self.local
            .read()
            .unwrap()
            .get(&Self::local_key(locale, role))
            .map(|entry| Arc::clone(&entry.tree))
    }

    /// Populate both tiers after a successful build.
    pub(crate) fn insert(&self, locale: &str, role: Option<&str>, tree: &Arc<NavigationTree>) {
        let version = self.current_version(locale);

        match serde_json::to_string(tree.as_ref()) {
            Ok(json) => {
                self.shared.set(
                    &self.entry_key(&version, locale, role),
                    &json,
                    Some(self.shared_ttl),
                );
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize navigation tree for cache");
            }
        }

        self.store_local(locale, role, version, tree);
    }

    fn store_local(
        &self,
        locale: &str,
        role: Option<&str>,
        version: String,
        tree: &Arc<NavigationTree>,
    ) {
        self.local.write().unwrap().insert(
            Self::local_key(locale, role),
            LocalEntry {
                version,
                expires_at: Instant::now() + self.local_ttl,
                tree: Arc::clone(tree),
            },
        );
    }

    /// Bump the version token and clear the local tier.
    ///
    /// `locale = None` invalidates every configured locale.
    pub(crate) fn invalidate(&self, locale: Option<&str>, all_locales: &[String]) {
        match locale {
            Some(locale) => {
                self.bump_version(locale);
                let marker = format!("{locale}:");
                self.local
                    .write()
                    .unwrap()
                    .retain(|key, _| !key.starts_with(&marker));
            }
            None => {
                for locale in all_locales {
                    self.bump_version(locale);
                }
                self.local.write().unwrap().clear();
            }
        }
    }

    fn bump_version(&self, locale: &str) {
        let current = self.current_version(locale);
        let next = current.parse::<u64>().unwrap_or(1).wrapping_add(1);
        self.shared
            .set(&self.version_key(locale), &next.to_string(), None);
        tracing::info!(locale, version = next, "navigation cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use nav_cache::MemorySharedCache;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::ResolvedNode;

    fn tree(label: &str) -> Arc<NavigationTree> {
        Arc::new(NavigationTree {
            items: vec![ResolvedNode {
                label: label.to_owned(),
                href: Some("/x".to_owned()),
                external: false,
                kind: nav_store::PageKind::Page,
                children: Vec::new(),
            }],
            legacy: false,
        })
    }

    fn cache(shared: &Arc<MemorySharedCache>, local_ttl: Duration) -> VersionedCache {
        VersionedCache::new(
            Arc::clone(shared) as Arc<dyn nav_cache::SharedCache>,
            "nav".to_owned(),
            local_ttl,
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn test_miss_on_empty_cache() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = cache(&shared, Duration::from_secs(30));

        assert!(cache.get("en", None).is_none());
    }

    #[test]
    fn test_insert_then_get() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = cache(&shared, Duration::from_secs(30));

        cache.insert("en", None, &tree("Home"));

        let got = cache.get("en", None).unwrap();
        assert_eq!(got.items[0].label, "Home");
    }

    #[test]
    fn test_role_keys_are_separate() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = cache(&shared, Duration::from_secs(30));

        cache.insert("en", None, &tree("Public"));
        cache.insert("en", Some("ADMIN"), &tree("Admin"));

        assert_eq!(cache.get("en", None).unwrap().items[0].label, "Public");
        assert_eq!(
            cache.get("en", Some("ADMIN")).unwrap().items[0].label,
            "Admin"
        );
    }

    #[test]
    fn test_invalidate_makes_entries_unreachable() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = cache(&shared, Duration::from_secs(30));

        cache.insert("en", None, &tree("Old"));
        cache.invalidate(Some("en"), &["en".to_owned()]);

        assert!(cache.get("en", None).is_none());
    }

    #[test]
    fn test_invalidation_reaches_other_process() {
        let shared = Arc::new(MemorySharedCache::new());
        // Two caches over one shared store model two independent processes.
        let reader = cache(&shared, Duration::from_secs(30));
        let writer = cache(&shared, Duration::from_secs(30));

        reader.insert("en", None, &tree("Old"));
        assert!(reader.get("en", None).is_some());

        writer.invalidate(Some("en"), &["en".to_owned()]);

        // The reader's local entry is version-stale and the shared key is
        // under the old version: a rebuild is forced.
        assert!(reader.get("en", None).is_none());
    }

    #[test]
    fn test_shared_tier_serves_other_process() {
        let shared = Arc::new(MemorySharedCache::new());
        let a = cache(&shared, Duration::from_secs(30));
        let b = cache(&shared, Duration::from_secs(30));

        a.insert("en", None, &tree("Shared"));

        assert_eq!(b.get("en", None).unwrap().items[0].label, "Shared");
    }

    #[test]
    fn test_local_entry_expires_to_shared_tier() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = cache(&shared, Duration::ZERO);

        cache.insert("en", None, &tree("Home"));

        // Local entry expired immediately; the shared tier still serves.
        assert!(cache.get("en", None).is_some());

        // With the shared entry gone too, it's a miss.
        shared.del("nav:1:en:-");
        assert!(cache.get("en", None).is_none());
    }

    #[test]
    fn test_local_tier_survives_shared_loss() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = cache(&shared, Duration::from_secs(30));

        cache.insert("en", None, &tree("Home"));
        shared.del("nav:1:en:-");

        // The local tier is still valid for the current version.
        assert!(cache.get("en", None).is_some());
    }

    #[test]
    fn test_invalidate_all_locales() {
        let shared = Arc::new(MemorySharedCache::new());
        let locales = vec!["en".to_owned(), "de".to_owned()];
        let cache = cache(&shared, Duration::from_secs(30));

        cache.insert("en", None, &tree("En"));
        cache.insert("de", None, &tree("De"));

        cache.invalidate(None, &locales);

        assert!(cache.get("en", None).is_none());
        assert!(cache.get("de", None).is_none());
    }

    #[test]
    fn test_invalidate_single_locale_keeps_other() {
        let shared = Arc::new(MemorySharedCache::new());
        let locales = vec!["en".to_owned(), "de".to_owned()];
        let cache = cache(&shared, Duration::from_secs(30));

        cache.insert("en", None, &tree("En"));
        cache.insert("de", None, &tree("De"));

        cache.invalidate(Some("en"), &locales);

        assert!(cache.get("en", None).is_none());
        assert!(cache.get("de", None).is_some());
    }

    #[test]
    fn test_get_stale_ignores_version() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = cache(&shared, Duration::from_secs(30));

        cache.insert("en", None, &tree("Stale"));
        // Version bumped remotely; normal get misses, stale get serves.
        shared.set("nav:version:en", "99", None);

        assert!(cache.get("en", None).is_none());
        assert_eq!(cache.get_stale("en", None).unwrap().items[0].label, "Stale");
    }

    #[test]
    fn test_corrupt_shared_entry_is_dropped() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = cache(&shared, Duration::ZERO);

        shared.set("nav:1:en:-", "not json", None);

        assert!(cache.get("en", None).is_none());
        // Entry was deleted, not left to fail again.
        assert!(shared.get("nav:1:en:-").is_none());
    }
}
