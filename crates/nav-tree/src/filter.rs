//! Visibility and access filtering.
//!
//! Removes nodes that are hidden or that require a role the caller does
//! not hold. Filtering is recursive and unconditional: pruning an ancestor
//! drops its entire subtree regardless of the descendants' own flags.

use crate::assemble::TreeNode;

/// Prune hidden and role-restricted branches.
///
/// A node without an `access_role` is public; a node with one is kept only
/// when `role` matches exactly.
pub(crate) fn apply(nodes: Vec<TreeNode>, role: Option<&str>) -> Vec<TreeNode> {
    nodes
        .into_iter()
        .filter_map(|mut node| {
            if !node.row.visible {
                return None;
            }
            if let Some(required) = node.row.access_role.as_deref()
                && role != Some(required)
            {
                return None;
            }
            node.children = apply(std::mem::take(&mut node.children), role);
            Some(node)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testutil::row;

    fn node(slug: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            row: row("en", Some(slug)),
            children,
        }
    }

    #[test]
    fn test_keeps_visible_public_nodes() {
        let nodes = vec![node("a", vec![]), node("b", vec![])];

        let kept = apply(nodes, None);

        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_removes_hidden_node_with_subtree() {
        let mut hidden = node("hidden", vec![node("visible-child", vec![])]);
        hidden.row.visible = false;

        let kept = apply(vec![hidden], None);

        // The visible child goes down with its ancestor.
        assert!(kept.is_empty());
    }

    #[test]
    fn test_role_restricted_node_absent_without_role() {
        let mut admin = node("admin", vec![]);
        admin.row.access_role = Some("ADMIN".to_owned());

        assert!(apply(vec![admin.clone()], None).is_empty());
        assert!(apply(vec![admin], Some("EDITOR")).is_empty());
    }

    #[test]
    fn test_role_restricted_node_present_with_matching_role() {
        let mut admin = node("admin", vec![node("child", vec![])]);
        admin.row.access_role = Some("ADMIN".to_owned());

        let kept = apply(vec![admin], Some("ADMIN"));

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].children.len(), 1);
    }

    #[test]
    fn test_filters_recursively() {
        let mut hidden_child = node("hidden", vec![]);
        hidden_child.row.visible = false;
        let parent = node("parent", vec![hidden_child, node("shown", vec![])]);

        let kept = apply(vec![parent], None);

        assert_eq!(kept[0].children.len(), 1);
        assert_eq!(kept[0].children[0].row.slug.as_deref(), Some("shown"));
    }
}
