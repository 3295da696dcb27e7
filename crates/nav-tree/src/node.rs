//! Resolved output types.
//!
//! [`ResolvedNode`] is what consumers render: a label, a final public URL,
//! and children. Both types serialize to JSON for the shared cache tier
//! and for HTTP responses.

use nav_store::PageKind;
use serde::{Deserialize, Serialize};

/// One element of the resolved navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNode {
    /// Display label.
    pub label: String,
    /// Final public URL. `None` for folders without an own target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// True when `href` points outside the site.
    #[serde(default)]
    pub external: bool,
    /// Addressing mode of the underlying row.
    pub kind: PageKind,
    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedNode>,
}

/// Result of a navigation read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTree {
    /// Root-level nodes.
    pub items: Vec<ResolvedNode>,
    /// True when the degraded flat-format fallback was used because no
    /// structured rows existed.
    #[serde(default)]
    pub legacy: bool,
}
