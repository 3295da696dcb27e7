//! Page row types.
//!
//! [`PageRow`] is the flat, locale-specific record the resolver consumes.
//! [`NewPageRow`] is the creation payload (identity assigned by the store),
//! [`RowPatch`] a partial update, and [`RowMove`] one element of a
//! transactional reorder batch.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Addressing mode of a navigational entry.
///
/// The path resolver matches on this exhaustively; adding a variant is a
/// compile-time-checked decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageKind {
    /// Regular page addressed by its structural slug path.
    Page,
    /// External link; `external_url` holds the target.
    Link,
    /// Container without an own target.
    Folder,
    /// Route-backed dynamic page; `route_path` holds the route pattern.
    Route,
}

/// One locale-specific instance of a navigational entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRow {
    /// Unique row id.
    pub id: Uuid,
    /// Logical-entity id shared across locale variants.
    ///
    /// Nullable in the store; healed to the row's own `id` on first read.
    pub group_id: Option<Uuid>,
    /// Parent row id in the **same locale**, `None` for root rows.
    pub parent_id: Option<Uuid>,
    /// Sibling ordering within the parent.
    pub order: i64,
    /// Locale code (e.g., "en", "de").
    pub locale: String,
    /// Path segment; `None` for [`PageKind::Link`] rows.
    pub slug: Option<String>,
    /// Link target, used when `kind` is [`PageKind::Link`].
    pub external_url: Option<String>,
    /// Route pattern, used when `kind` is [`PageKind::Route`].
    /// May contain placeholder segments (`[slug]`, `[...path]`).
    pub route_path: Option<String>,
    /// Path override taking precedence over structural path computation.
    /// May contain placeholder segments.
    pub route_override: Option<String>,
    /// Display label; falls back to the slug when absent.
    pub nav_label: Option<String>,
    /// Addressing mode.
    pub kind: PageKind,
    /// Whether the entry appears in navigation at all.
    pub visible: bool,
    /// Role the caller must hold to see this entry; `None` means public.
    pub access_role: Option<String>,
}

/// Creation payload for a row; the store assigns the `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPageRow {
    /// Logical-entity id shared across locale variants.
    pub group_id: Option<Uuid>,
    /// Parent row id in the same locale.
    pub parent_id: Option<Uuid>,
    /// Sibling ordering within the parent.
    pub order: i64,
    /// Locale code.
    pub locale: String,
    /// Path segment.
    pub slug: Option<String>,
    /// Link target.
    pub external_url: Option<String>,
    /// Route pattern.
    pub route_path: Option<String>,
    /// Path override.
    pub route_override: Option<String>,
    /// Display label.
    pub nav_label: Option<String>,
    /// Addressing mode.
    pub kind: PageKind,
    /// Visibility flag.
    pub visible: bool,
    /// Required caller role.
    pub access_role: Option<String>,
}

impl NewPageRow {
    /// Materialize a [`PageRow`] with a store-assigned id.
    #[must_use]
    pub fn into_row(self, id: Uuid) -> PageRow {
        PageRow {
            id,
            group_id: self.group_id,
            parent_id: self.parent_id,
            order: self.order,
            locale: self.locale,
            slug: self.slug,
            external_url: self.external_url,
            route_path: self.route_path,
            route_override: self.route_override,
            nav_label: self.nav_label,
            kind: self.kind,
            visible: self.visible,
            access_role: self.access_role,
        }
    }
}

/// Partial row update. `None` fields are left untouched.
///
/// `parent_id` is doubly optional: the outer `Option` is "change or not",
/// the inner one the new value (a row can be moved to the root).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowPatch {
    /// New group id (used by the group-id self-heal).
    pub group_id: Option<Uuid>,
    /// New parent row id.
    pub parent_id: Option<Option<Uuid>>,
    /// New sibling order.
    pub order: Option<i64>,
    /// New display label.
    pub nav_label: Option<String>,
    /// New visibility flag.
    pub visible: Option<bool>,
}

/// One element of a transactional reorder batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowMove {
    /// Row to move.
    pub id: Uuid,
    /// New parent row id (same locale), `None` for root.
    pub parent_id: Option<Uuid>,
    /// New sibling order.
    pub order: i64,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_row() -> PageRow {
        PageRow {
            id: Uuid::new_v4(),
            group_id: None,
            parent_id: None,
            order: 0,
            locale: "en".to_owned(),
            slug: Some("guide".to_owned()),
            external_url: None,
            route_path: None,
            route_override: None,
            nav_label: Some("Guide".to_owned()),
            kind: PageKind::Page,
            visible: true,
            access_role: None,
        }
    }

    #[test]
    fn test_kind_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(PageKind::Page).unwrap(),
            serde_json::json!("PAGE")
        );
        assert_eq!(
            serde_json::to_value(PageKind::Route).unwrap(),
            serde_json::json!("ROUTE")
        );
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            PageKind::Page,
            PageKind::Link,
            PageKind::Folder,
            PageKind::Route,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: PageKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_new_row_into_row_keeps_fields() {
        let new = NewPageRow {
            group_id: None,
            parent_id: None,
            order: 7,
            locale: "de".to_owned(),
            slug: Some("handbuch".to_owned()),
            external_url: None,
            route_path: None,
            route_override: None,
            nav_label: Some("Handbuch".to_owned()),
            kind: PageKind::Page,
            visible: true,
            access_role: Some("EDITOR".to_owned()),
        };

        let id = Uuid::new_v4();
        let row = new.into_row(id);

        assert_eq!(row.id, id);
        assert_eq!(row.order, 7);
        assert_eq!(row.locale, "de");
        assert_eq!(row.slug.as_deref(), Some("handbuch"));
        assert_eq!(row.access_role.as_deref(), Some("EDITOR"));
    }

    #[test]
    fn test_row_patch_default_changes_nothing() {
        let patch = RowPatch::default();

        assert!(patch.group_id.is_none());
        assert!(patch.parent_id.is_none());
        assert!(patch.order.is_none());
        assert!(patch.nav_label.is_none());
        assert!(patch.visible.is_none());
    }

    #[test]
    fn test_row_serde_roundtrip() {
        let row = sample_row();
        let json = serde_json::to_string(&row).unwrap();
        let back: PageRow = serde_json::from_str(&json).unwrap();

        assert_eq!(back, row);
    }
}
