//! Shared helpers for unit tests.

use nav_store::{PageKind, PageRow};
use uuid::Uuid;

/// Build a visible PAGE row in its own group.
pub(crate) fn row(locale: &str, slug: Option<&str>) -> PageRow {
    let id = Uuid::new_v4();
    PageRow {
        id,
        group_id: Some(id),
        parent_id: None,
        order: 0,
        locale: locale.to_owned(),
        slug: slug.map(str::to_owned),
        external_url: None,
        route_path: None,
        route_override: None,
        nav_label: None,
        kind: PageKind::Page,
        visible: true,
        access_role: None,
    }
}

/// Build a locale variant of `original` sharing its group.
pub(crate) fn variant(original: &PageRow, locale: &str, slug: Option<&str>) -> PageRow {
    let mut v = row(locale, slug);
    v.group_id = original.group_id;
    v.order = original.order;
    v.kind = original.kind;
    v.visible = original.visible;
    v.access_role = original.access_role.clone();
    v
}

/// Build a child of `parent` in the same locale.
pub(crate) fn child_of(parent: &PageRow, slug: Option<&str>) -> PageRow {
    let mut c = row(&parent.locale, slug);
    c.parent_id = Some(parent.id);
    c
}
