//! Navigation resolution entry point.
//!
//! [`NavResolver`] combines the locale-coverage pass, tree assembly,
//! filtering, and path resolution behind the two-tier cache. It is
//! designed for stateless request handling: every instance only holds the
//! row store, the shared cache handle, and its own local cache tier, and
//! several instances over the same shared store coordinate purely through
//! version tokens.
//!
//! A build that fails part-way never populates the cache; only successful
//! builds do.

use std::sync::Arc;
use std::time::Duration;

use nav_cache::SharedCache;
use nav_store::{RowStore, StoreError};

use crate::node::NavigationTree;
use crate::versioned_cache::VersionedCache;
use crate::{assemble, coverage, filter, path};

/// Configuration for [`NavResolver`].
#[derive(Clone, Debug)]
pub struct NavConfig {
    /// Locales every group must be covered in.
    pub locales: Vec<String>,
    /// Locale whose rows provide templates and canonical ordering.
    pub default_locale: String,
    /// Prefix for all shared-cache keys.
    pub key_prefix: String,
    /// TTL of process-local cache entries.
    pub local_ttl: Duration,
    /// TTL of shared cache entries (memory bound, not invalidation).
    pub shared_ttl: Duration,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_owned()],
            default_locale: "en".to_owned(),
            key_prefix: "nav".to_owned(),
            local_ttl: Duration::from_secs(15),
            shared_ttl: Duration::from_secs(3600),
        }
    }
}

/// Per-request options for [`NavResolver::navigation`].
#[derive(Clone, Debug, Default)]
pub struct NavOptions {
    /// Skip both cache tiers and rebuild.
    pub force_refresh: bool,
    /// Role held by the caller; gates `access_role`-restricted nodes.
    pub role: Option<String>,
    /// Serve a stale local entry if the rebuild fails.
    ///
    /// Off by default: the core never serves stale-on-error silently.
    pub stale_on_error: bool,
}

/// Error returned when navigation resolution fails.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Row store read or write failed during the tree build.
    #[error("row store error: {0}")]
    Store(#[from] StoreError),
}

/// Multi-locale navigation resolver with two-tier caching.
pub struct NavResolver {
    store: Arc<dyn RowStore>,
    cache: VersionedCache,
    config: NavConfig,
}

impl NavResolver {
    /// Create a new resolver.
    ///
    /// # Arguments
    ///
    /// * `store` - Row store, the single writer-of-record
    /// * `shared` - Shared cache tier reachable by all invocations
    /// * `config` - Locale set and cache tuning
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>, shared: Arc<dyn SharedCache>, config: NavConfig) -> Self {
        let cache = VersionedCache::new(
            shared,
            config.key_prefix.clone(),
            config.local_ttl,
            config.shared_ttl,
        );
        Self {
            store,
            cache,
            config,
        }
    }

    /// Resolve the navigation tree for a locale.
    ///
    /// Serves from cache when possible; on miss, materializes the tree
    /// (coverage, assembly, filtering, path resolution) and populates both
    /// cache tiers.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Store`] when the row store fails during a
    /// rebuild. No cache entry is written in that case; with
    /// [`NavOptions::stale_on_error`] set, a stale local entry is served
    /// instead when one exists.
    pub fn navigation(&self, locale: &str, options: &NavOptions) -> Result<NavigationTree, NavError> {
        let role = options.role.as_deref();

        if !options.force_refresh
            && let Some(tree) = self.cache.get(locale, role)
        {
            return Ok((*tree).clone());
        }

        match self.build(locale, role) {
            Ok(tree) => {
                let tree = Arc::new(tree);
                self.cache.insert(locale, role, &tree);
                Ok((*tree).clone())
            }
            Err(e) if options.stale_on_error && !options.force_refresh => {
                if let Some(stale) = self.cache.get_stale(locale, role) {
                    tracing::warn!(error = %e, locale, "tree build failed, serving stale entry");
                    Ok((*stale).clone())
                } else {
                    Err(e)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Invalidate cached trees after a row mutation.
    ///
    /// Omitting `locale` invalidates all configured locales. Reaches every
    /// independent invocation through the shared version token.
    pub fn invalidate(&self, locale: Option<&str>) {
        self.cache.invalidate(locale, &self.config.locales);
    }

    /// Materialize the tree from the row store.
    fn build(&self, locale: &str, role: Option<&str>) -> Result<NavigationTree, NavError> {
        let rows = self.store.find_all()?;

        if rows.is_empty() {
            tracing::debug!(locale, "no structured navigation rows, using legacy fallback");
            return Ok(NavigationTree {
                items: Vec::new(),
                legacy: true,
            });
        }

        let rows = coverage::ensure_locale_coverage(
            self.store.as_ref(),
            rows,
            &self.config.locales,
            &self.config.default_locale,
        )?;

        let nodes = assemble::assemble(&rows, locale, &self.config.default_locale);
        let nodes = filter::apply(nodes, role);
        let items = path::resolve(nodes);

        Ok(NavigationTree {
            items,
            legacy: false,
        })
    }
}
