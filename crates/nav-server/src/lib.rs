//! HTTP server for the navigation resolver.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - The resolved navigation tree per locale
//! - The invalidation endpoint called by the authoring collaborator after
//!   row mutations
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum server (nav-server)
//!                       │
//!                       ├─► GET  /api/navigation/{locale} ──► NavResolver
//!                       │
//!                       └─► POST /api/navigation/invalidate ──► NavResolver
//! ```
//!
//! The server holds one [`NavResolver`] whose local cache tier lives for
//! the process lifetime; other processes sharing the same shared-cache
//! backend coordinate with it purely through version tokens.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use nav_server::{ServerConfig, run_server};
//! use nav_store::MemoryRowStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MemoryRowStore::new());
//!     run_server(ServerConfig::default(), store).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use nav_cache::{FileSharedCache, MemorySharedCache, SharedCache};
use nav_store::RowStore;
use nav_tree::{NavConfig, NavResolver};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Locales every group must be covered in.
    pub locales: Vec<String>,
    /// Default locale (templates and canonical ordering).
    pub default_locale: String,
    /// Directory for the file-backed shared cache tier.
    ///
    /// If `None`, an in-process cache is used instead; invalidations then
    /// do not reach other processes.
    pub cache_dir: Option<PathBuf>,
    /// TTL of process-local cache entries, in seconds.
    pub local_ttl_secs: u64,
    /// TTL of shared cache entries, in seconds.
    pub shared_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            locales: vec!["en".to_owned()],
            default_locale: "en".to_owned(),
            cache_dir: None,
            local_ttl_secs: 15,
            shared_ttl_secs: 3600,
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `store` - Row store backing the resolver
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(
    config: ServerConfig,
    store: Arc<dyn RowStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let shared: Arc<dyn SharedCache> = match &config.cache_dir {
        Some(dir) => Arc::new(FileSharedCache::new(dir.clone())),
        None => Arc::new(MemorySharedCache::new()),
    };

    let nav_config = NavConfig {
        locales: config.locales.clone(),
        default_locale: config.default_locale.clone(),
        local_ttl: Duration::from_secs(config.local_ttl_secs),
        shared_ttl: Duration::from_secs(config.shared_ttl_secs),
        ..NavConfig::default()
    };
    let resolver = Arc::new(NavResolver::new(store, shared, nav_config));

    let state = Arc::new(AppState { resolver });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
