//! Locale coverage pass.
//!
//! Guarantees that every logical group has one row per configured locale,
//! synthesizing and persisting missing rows. Groups are processed in
//! parent-before-child order so a synthesized child can always resolve a
//! same-locale parent.
//!
//! The pass is idempotent: re-running it on an already covered row set
//! performs no writes. Duplicate synthesis by a concurrent invocation is
//! resolved by the store's `(slug, locale)` unique constraint; a conflict
//! means "someone else already healed it" and is ignored.

use std::collections::{BTreeMap, HashMap, HashSet};

use nav_store::{NewPageRow, PageRow, RowPatch, RowStore, StoreError};
use uuid::Uuid;

/// Ensure every group has a row in every configured locale.
///
/// Returns the full row set; if any write occurred the rows are re-fetched
/// from the store so subsequent passes see referentially correct data.
pub(crate) fn ensure_locale_coverage(
    store: &dyn RowStore,
    mut rows: Vec<PageRow>,
    locales: &[String],
    default_locale: &str,
) -> Result<Vec<PageRow>, StoreError> {
    let mut wrote = false;

    // Heal missing group ids: a row without one is a group of one.
    for row in &mut rows {
        if row.group_id.is_none() {
            store.update(
                row.id,
                RowPatch {
                    group_id: Some(row.id),
                    ..RowPatch::default()
                },
            )?;
            row.group_id = Some(row.id);
            wrote = true;
            tracing::debug!(row = %row.id, "healed missing group id");
        }
    }

    let id_to_group: HashMap<Uuid, Uuid> = rows
        .iter()
        .map(|r| (r.id, r.group_id.unwrap_or(r.id)))
        .collect();

    // Group membership: locale -> row index, first row per locale wins.
    let mut members: BTreeMap<Uuid, BTreeMap<String, usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        members
            .entry(row.group_id.unwrap_or(row.id))
            .or_default()
            .entry(row.locale.clone())
            .or_insert(i);
    }

    // Parent group, derived from the first member that has a parent
    // (default locale preferred).
    let parent_of: HashMap<Uuid, Option<Uuid>> = members
        .iter()
        .map(|(gid, m)| {
            let parent = m
                .get(default_locale)
                .into_iter()
                .chain(m.values())
                .filter_map(|&i| rows[i].parent_id)
                .find_map(|pid| id_to_group.get(&pid).copied())
                .filter(|p| p != gid);
            (*gid, parent)
        })
        .collect();

    let (depths, cycle_groups) = group_depths(&members, &parent_of);

    let mut order: Vec<Uuid> = members.keys().copied().collect();
    order.sort_by_key(|gid| (depths.get(gid).copied().unwrap_or(0), *gid));

    // Same-locale lookup, updated as rows are synthesized.
    let mut locale_index: HashMap<(Uuid, String), Uuid> = rows
        .iter()
        .map(|r| ((r.group_id.unwrap_or(r.id), r.locale.clone()), r.id))
        .collect();
    let mut slugs: HashSet<(String, String)> = rows
        .iter()
        .filter_map(|r| r.slug.clone().map(|s| (s, r.locale.clone())))
        .collect();

    for gid in order {
        let m = &members[&gid];
        let Some(&template_idx) = m.get(default_locale).or_else(|| m.values().next()) else {
            continue;
        };
        let template = rows[template_idx].clone();

        for locale in locales {
            if locale_index.contains_key(&(gid, locale.clone())) {
                continue;
            }

            // Resolve the parent row in the target locale. Parents were
            // processed first, so a healthy tree always finds one. Groups
            // caught in a parent cycle are promoted to root.
            let parent_id = match template.parent_id {
                _ if cycle_groups.contains(&gid) => None,
                None => None,
                Some(pid) => {
                    let parent_group = id_to_group.get(&pid).copied();
                    match parent_group
                        .and_then(|pg| locale_index.get(&(pg, locale.clone())).copied())
                    {
                        Some(id) => Some(id),
                        None => {
                            tracing::warn!(
                                group = %gid,
                                locale,
                                "no parent row in target locale, skipping synthesis for this node"
                            );
                            continue;
                        }
                    }
                }
            };

            let slug = template
                .slug
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| allocate_slug(s, locale, &slugs));

            let new = NewPageRow {
                group_id: Some(gid),
                parent_id,
                order: template.order,
                locale: locale.clone(),
                slug: slug.clone(),
                external_url: template.external_url.clone(),
                route_path: template.route_path.clone(),
                route_override: template.route_override.clone(),
                nav_label: template.nav_label.clone(),
                kind: template.kind,
                visible: template.visible,
                access_role: template.access_role.clone(),
            };

            match store.create(new) {
                Ok(created) => {
                    locale_index.insert((gid, locale.clone()), created.id);
                    if let Some(s) = created.slug {
                        slugs.insert((s, locale.clone()));
                    }
                    wrote = true;
                    tracing::debug!(group = %gid, locale, "synthesized missing locale row");
                }
                Err(e) if e.is_conflict() => {
                    // A concurrent invocation created the same row between
                    // our read and this write. Its row surfaces in the
                    // re-fetch below.
                    tracing::debug!(group = %gid, locale, "row already synthesized concurrently");
                    wrote = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    if wrote { store.find_all() } else { Ok(rows) }
}

/// Compute group depths (0 = root), tolerating parent cycles.
///
/// Returns the depth map and the set of groups caught in a parent cycle.
/// Cycle members are treated as roots; the assembler applies the same
/// promotion when attaching nodes.
fn group_depths(
    members: &BTreeMap<Uuid, BTreeMap<String, usize>>,
    parent_of: &HashMap<Uuid, Option<Uuid>>,
) -> (HashMap<Uuid, usize>, HashSet<Uuid>) {
    let mut depths: HashMap<Uuid, usize> = HashMap::new();
    let mut cycles: HashSet<Uuid> = HashSet::new();

    for &gid in members.keys() {
        if depths.contains_key(&gid) {
            continue;
        }

        let mut chain = vec![gid];
        let mut seen: HashSet<Uuid> = HashSet::from([gid]);
        let mut base = 0;

        loop {
            let cur = *chain.last().unwrap();
            match parent_of.get(&cur).copied().flatten() {
                None => break,
                Some(p) => {
                    if let Some(&d) = depths.get(&p) {
                        base = d + 1;
                        break;
                    }
                    if !seen.insert(p) {
                        // Everything from p's position onward loops.
                        tracing::warn!(group = %cur, "parent cycle detected, treating as root");
                        let start = chain.iter().position(|&g| g == p).unwrap_or(0);
                        cycles.extend(chain[start..].iter().copied());
                        break;
                    }
                    chain.push(p);
                }
            }
        }

        for (offset, g) in chain.iter().rev().enumerate() {
            depths.entry(*g).or_insert(base + offset);
        }
    }

    (depths, cycles)
}

/// Allocate a slug unique within `locale`.
///
/// Tries the template slug verbatim, then a locale-qualified suffix, then
/// numbered suffixes until unique.
fn allocate_slug(base: &str, locale: &str, taken: &HashSet<(String, String)>) -> String {
    let is_free = |s: &str| !taken.contains(&(s.to_owned(), locale.to_owned()));

    if is_free(base) {
        return base.to_owned();
    }

    let qualified = format!("{base}-{locale}");
    if is_free(&qualified) {
        return qualified;
    }

    let mut n = 2u64;
    loop {
        let candidate = format!("{qualified}-{n}");
        if is_free(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
