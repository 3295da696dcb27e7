//! Public URL resolution.
//!
//! Assigns every node its final `href` according to its addressing mode,
//! in priority order: route override, route pattern, external link,
//! folder (no target), plain structural path.
//!
//! A route override or route pattern establishes a *route base*: the
//! node's descendants append their structural segments under that base
//! instead of under the plain hierarchical path.
//!
//! Placeholder segments (`[name]` single, `[...name]` catch-all) inside a
//! route are substituted with the node's structural slug path. A missing
//! slug substitutes as an empty string rather than failing the build, so
//! one malformed node cannot take down the whole navigation.

use std::sync::LazyLock;

use nav_store::PageKind;
use regex::{Captures, Regex};

use crate::assemble::TreeNode;
use crate::node::ResolvedNode;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\.\.\.)?[A-Za-z0-9_-]+\]").unwrap());

#[derive(Clone, Debug, Default)]
struct PathContext {
    /// Segments under which children resolve (route base or plain path).
    base: Vec<String>,
    /// Pure structural slug chain, independent of route bases.
    structural: Vec<String>,
}

/// Resolve hrefs for the whole forest.
pub(crate) fn resolve(nodes: Vec<TreeNode>) -> Vec<ResolvedNode> {
    let ctx = PathContext::default();
    nodes
        .into_iter()
        .map(|node| resolve_node(node, &ctx))
        .collect()
}

fn resolve_node(node: TreeNode, ctx: &PathContext) -> ResolvedNode {
    let row = node.row;

    let own_slug = row
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    let mut structural = ctx.structural.clone();
    if let Some(slug) = &own_slug {
        structural.push(slug.clone());
    }

    let route_override = row
        .route_override
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let route_path = row
        .route_path
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (href, external, child_base) = if let Some(pattern) = route_override {
        let base = route_base(pattern, own_slug.as_deref(), &structural);
        (Some(format!("/{}", base.join("/"))), false, base)
    } else if row.kind == PageKind::Route
        && let Some(pattern) = route_path
    {
        let base = route_base(pattern, own_slug.as_deref(), &structural);
        (Some(format!("/{}", base.join("/"))), false, base)
    } else {
        match row.kind {
            PageKind::Link => (row.external_url.clone(), row.external_url.is_some(), ctx.base.clone()),
            PageKind::Folder => {
                let mut base = ctx.base.clone();
                base.extend(own_slug.clone());
                (None, false, base)
            }
            PageKind::Page | PageKind::Route => {
                let mut base = ctx.base.clone();
                base.extend(own_slug.clone());
                (Some(format!("/{}", base.join("/"))), false, base)
            }
        }
    };

    let label = row
        .nav_label
        .clone()
        .filter(|l| !l.is_empty())
        .or_else(|| own_slug.clone())
        .or_else(|| row.external_url.clone())
        .unwrap_or_default();

    let child_ctx = PathContext {
        base: child_base,
        structural,
    };

    ResolvedNode {
        label,
        href,
        external,
        kind: row.kind,
        children: node
            .children
            .into_iter()
            .map(|child| resolve_node(child, &child_ctx))
            .collect(),
    }
}

/// Compute the route base segments for a route pattern.
///
/// When the pattern contains placeholders, each `[name]` receives the
/// node's own slug and each `[...name]` the full structural chain.
/// Without placeholders, the node's own segment is appended to the
/// pattern. Empty segments (from empty substitutions or doubled slashes)
/// are dropped.
fn route_base(pattern: &str, own_slug: Option<&str>, structural: &[String]) -> Vec<String> {
    let trimmed = pattern.trim_start_matches('/');

    let substituted = if PLACEHOLDER_RE.is_match(trimmed) {
        PLACEHOLDER_RE
            .replace_all(trimmed, |caps: &Captures<'_>| {
                if caps.get(1).is_some() {
                    structural.join("/")
                } else {
                    own_slug.unwrap_or_default().to_owned()
                }
            })
            .into_owned()
    } else {
        match own_slug {
            Some(slug) => format!("{trimmed}/{slug}"),
            None => trimmed.to_owned(),
        }
    };

    substituted
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
