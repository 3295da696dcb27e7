//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use nav_tree::NavResolver;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Navigation resolver with its process-local cache tier.
    pub(crate) resolver: Arc<NavResolver>,
}
