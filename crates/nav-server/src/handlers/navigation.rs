//! Navigation API endpoints.
//!
//! Serves the resolved navigation tree and accepts invalidation requests
//! from the authoring collaborator.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use nav_tree::{NavOptions, NavigationTree};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for GET /api/navigation/{locale}.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NavigationQuery {
    /// Role held by the caller.
    pub(crate) role: Option<String>,
    /// Skip the cache and rebuild.
    #[serde(default)]
    pub(crate) refresh: bool,
}

/// Handle GET /api/navigation/{locale}.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
    Path(locale): Path<String>,
    Query(query): Query<NavigationQuery>,
) -> Result<Json<NavigationTree>, ApiError> {
    let options = NavOptions {
        force_refresh: query.refresh,
        role: query.role,
        stale_on_error: false,
    };

    let tree = state.resolver.navigation(&locale, &options)?;
    Ok(Json(tree))
}

/// Query parameters for POST /api/navigation/invalidate.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct InvalidateQuery {
    /// Locale to invalidate; all configured locales when omitted.
    pub(crate) locale: Option<String>,
}

/// Handle POST /api/navigation/invalidate.
pub(crate) async fn invalidate_navigation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InvalidateQuery>,
) -> StatusCode {
    state.resolver.invalidate(query.locale.as_deref());
    StatusCode::NO_CONTENT
}
