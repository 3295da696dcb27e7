//! Multi-locale navigation tree resolver.
//!
//! This crate turns a flat table of locale-specific page rows into a
//! nested, locale-resolved navigation tree and serves it through a
//! two-tier cache with version-based invalidation.
//!
//! # Architecture
//!
//! A read request enters [`NavResolver::navigation`]. On cache miss the
//! resolver materializes the tree in four passes:
//!
//! 1. **Locale coverage** — every logical group gets one row per
//!    configured locale; missing rows are synthesized and persisted.
//! 2. **Assembly** — the locale-complete row set becomes a rooted forest,
//!    one representative node per group, with a canonical sibling order.
//! 3. **Filtering** — hidden and role-restricted branches are pruned.
//! 4. **Path resolution** — every node gets its public URL according to
//!    its addressing mode.
//!
//! The result populates both cache tiers. Writers (the external authoring
//! collaborator) call [`NavResolver::invalidate`] after committing row
//! mutations; a version token in the shared cache makes every previously
//! cached key unreachable without enumerating keys.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use nav_cache::MemorySharedCache;
//! use nav_store::MemoryRowStore;
//! use nav_tree::{NavConfig, NavOptions, NavResolver};
//!
//! let store = Arc::new(MemoryRowStore::new());
//! let shared = Arc::new(MemorySharedCache::new());
//! let resolver = NavResolver::new(store, shared, NavConfig::default());
//!
//! let tree = resolver.navigation("en", &NavOptions::default())?;
//! # Ok(())
//! # }
//! ```

mod assemble;
mod coverage;
mod filter;
mod node;
mod path;
mod resolver;
mod versioned_cache;

#[cfg(test)]
pub(crate) mod testutil;

pub use node::{NavigationTree, ResolvedNode};
pub use resolver::{NavConfig, NavError, NavOptions, NavResolver};

// Re-export PageKind from nav-store for convenience
pub use nav_store::PageKind;
