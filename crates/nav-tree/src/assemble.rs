//! Grouped tree assembly.
//!
//! Converts a locale-complete row set into a rooted forest with one
//! representative node per group. Parent/child links are resolved by
//! group, not by row id: a group's parent is the group containing the row
//! referenced by the representative's `parent_id`.
//!
//! Sibling order is canonical per group, taken preferentially from the
//! default-locale member, so locale variants never drift in ordering.
//!
//! # Cycle Guard
//!
//! Stale edits can make `parent_id` chains loop. The assembler walks each
//! group's ancestor chain with a visited set; a group whose chain reaches
//! itself is promoted to root instead of recursing forever.

use std::collections::{BTreeMap, HashMap, HashSet};

use nav_store::PageRow;
use uuid::Uuid;

/// One node of the assembled (not yet filtered or path-resolved) forest.
#[derive(Clone, Debug)]
pub(crate) struct TreeNode {
    /// Representative row for the requested locale.
    pub(crate) row: PageRow,
    /// Children sorted by canonical order.
    pub(crate) children: Vec<TreeNode>,
}

struct GroupEntry<'a> {
    representative: &'a PageRow,
    order: i64,
    parent: Option<Uuid>,
}

/// Assemble the forest for `locale`.
///
/// The representative of each group is the row in the requested locale,
/// else the default locale, else any member (deterministically the one
/// with the smallest locale code).
pub(crate) fn assemble(rows: &[PageRow], locale: &str, default_locale: &str) -> Vec<TreeNode> {
    let id_to_group: HashMap<Uuid, Uuid> = rows
        .iter()
        .map(|r| (r.id, r.group_id.unwrap_or(r.id)))
        .collect();

    let mut members: BTreeMap<Uuid, BTreeMap<&str, &PageRow>> = BTreeMap::new();
    for row in rows {
        members
            .entry(row.group_id.unwrap_or(row.id))
            .or_default()
            .entry(row.locale.as_str())
            .or_insert(row);
    }

    let mut entries: BTreeMap<Uuid, GroupEntry<'_>> = BTreeMap::new();
    for (gid, m) in &members {
        let Some(&representative) = m
            .get(locale)
            .or_else(|| m.get(default_locale))
            .or_else(|| m.values().next())
        else {
            continue;
        };
        let order = m.get(default_locale).map_or(representative.order, |r| r.order);
        let parent = representative
            .parent_id
            .and_then(|pid| id_to_group.get(&pid).copied())
            .filter(|p| p != gid);
        entries.insert(
            *gid,
            GroupEntry {
                representative,
                order,
                parent,
            },
        );
    }

    // Promote cycle members to root.
    let mut promoted: HashSet<Uuid> = HashSet::new();
    for &gid in entries.keys() {
        let mut seen = HashSet::from([gid]);
        let mut cur = entries[&gid].parent;
        while let Some(p) = cur {
            if p == gid {
                tracing::warn!(group = %gid, "parent cycle detected, promoting group to root");
                promoted.insert(gid);
                break;
            }
            if !seen.insert(p) {
                break;
            }
            cur = entries.get(&p).and_then(|e| e.parent);
        }
    }

    let mut children_of: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut roots: Vec<Uuid> = Vec::new();
    for (gid, entry) in &entries {
        match entry.parent {
            Some(p) if !promoted.contains(gid) && entries.contains_key(&p) => {
                children_of.entry(p).or_default().push(*gid);
            }
            _ => roots.push(*gid),
        }
    }

    sort_siblings(&mut roots, &entries);
    roots
        .into_iter()
        .map(|gid| build(gid, &entries, &children_of))
        .collect()
}

/// Sort a sibling list by canonical order, slug, then group id.
fn sort_siblings(siblings: &mut [Uuid], entries: &BTreeMap<Uuid, GroupEntry<'_>>) {
    siblings.sort_by_key(|gid| {
        let e = &entries[gid];
        (
            e.order,
            e.representative.slug.clone().unwrap_or_default(),
            *gid,
        )
    });
}

fn build(
    gid: Uuid,
    entries: &BTreeMap<Uuid, GroupEntry<'_>>,
    children_of: &HashMap<Uuid, Vec<Uuid>>,
) -> TreeNode {
    let mut child_ids = children_of.get(&gid).cloned().unwrap_or_default();
    sort_siblings(&mut child_ids, entries);

    TreeNode {
        row: entries[&gid].representative.clone(),
        children: child_ids
            .into_iter()
            .map(|c| build(c, entries, children_of))
            .collect(),
    }
}
