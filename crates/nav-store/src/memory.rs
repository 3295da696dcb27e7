//! In-memory row store for testing.
//!
//! Provides [`MemoryRowStore`] for unit testing without a database. The
//! store enforces the `(slug, locale)` unique constraint the same way a
//! relational backend would, so conflict-tolerance paths can be exercised.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use uuid::Uuid;

use crate::row::{NewPageRow, PageRow, RowMove, RowPatch};
use crate::store::{RowStore, StoreError, StoreErrorKind};

/// In-memory [`RowStore`] for tests.
///
/// Counts reads and writes so tests can assert on cache behavior and
/// idempotence, and can be switched into a failing mode to exercise
/// error paths.
///
/// # Example
///
/// ```
/// use nav_store::{MemoryRowStore, NewPageRow, PageKind, RowStore};
///
/// let store = MemoryRowStore::new();
/// store
///     .create(NewPageRow {
///         group_id: None,
///         parent_id: None,
///         order: 0,
///         locale: "en".to_owned(),
///         slug: Some("guide".to_owned()),
///         external_url: None,
///         route_path: None,
///         route_override: None,
///         nav_label: Some("Guide".to_owned()),
///         kind: PageKind::Page,
///         visible: true,
///         access_role: None,
///     })
///     .unwrap();
///
/// assert_eq!(store.find_all().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: RwLock<Vec<PageRow>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
}

impl MemoryRowStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a row, keeping its id.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_row(self, row: PageRow) -> Self {
        self.rows.write().unwrap().push(row);
        self
    }

    /// Number of `find_all` calls so far.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of mutating calls (`create`, `update`, `reorder`) so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Make subsequent `find_all` calls fail with an `Unavailable` error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    fn slug_taken(rows: &[PageRow], slug: &str, locale: &str) -> bool {
        rows.iter()
            .any(|r| r.locale == locale && r.slug.as_deref() == Some(slug))
    }
}

impl RowStore for MemoryRowStore {
    fn find_all(&self) -> Result<Vec<PageRow>, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError::new(StoreErrorKind::Unavailable).with_backend("Memory"));
        }
        Ok(self.rows.read().unwrap().clone())
    }

    fn create(&self, row: NewPageRow) -> Result<PageRow, StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.write().unwrap();

        if let Some(slug) = row.slug.as_deref()
            && Self::slug_taken(&rows, slug, &row.locale)
        {
            return Err(StoreError::conflict().with_backend("Memory"));
        }

        let created = row.into_row(Uuid::new_v4());
        rows.push(created.clone());
        Ok(created)
    }

    fn update(&self, id: Uuid, patch: RowPatch) -> Result<PageRow, StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.write().unwrap();

        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found(id).with_backend("Memory"))?;

        if let Some(group_id) = patch.group_id {
            row.group_id = Some(group_id);
        }
        if let Some(parent_id) = patch.parent_id {
            row.parent_id = parent_id;
        }
        if let Some(order) = patch.order {
            row.order = order;
        }
        if let Some(nav_label) = patch.nav_label {
            row.nav_label = Some(nav_label);
        }
        if let Some(visible) = patch.visible {
            row.visible = visible;
        }

        Ok(row.clone())
    }

    fn reorder(&self, moves: &[RowMove]) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.write().unwrap();

        // Validate the whole batch before touching anything.
        for m in moves {
            if !rows.iter().any(|r| r.id == m.id) {
                return Err(StoreError::not_found(m.id).with_backend("Memory"));
            }
        }

        for m in moves {
            if let Some(row) = rows.iter_mut().find(|r| r.id == m.id) {
                row.parent_id = m.parent_id;
                row.order = m.order;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::row::PageKind;

    fn new_row(locale: &str, slug: Option<&str>) -> NewPageRow {
        NewPageRow {
            group_id: None,
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

    #[test]
    fn test_create_and_find_all() {
        let store = MemoryRowStore::new();

        let created = store.create(new_row("en", Some("guide"))).unwrap();
        let rows = store.find_all().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, created.id);
        assert_eq!(rows[0].slug.as_deref(), Some("guide"));
    }

    #[test]
    fn test_create_duplicate_slug_same_locale_conflicts() {
        let store = MemoryRowStore::new();
        store.create(new_row("en", Some("guide"))).unwrap();

        let err = store.create(new_row("en", Some("guide"))).unwrap_err();

        assert!(err.is_conflict());
    }

    #[test]
    fn test_create_duplicate_slug_other_locale_allowed() {
        let store = MemoryRowStore::new();
        store.create(new_row("en", Some("guide"))).unwrap();

        // Same slug in a different locale is fine.
        store.create(new_row("de", Some("guide"))).unwrap();

        assert_eq!(store.find_all().unwrap().len(), 2);
    }

    #[test]
    fn test_create_null_slugs_never_conflict() {
        let store = MemoryRowStore::new();
        store.create(new_row("en", None)).unwrap();
        store.create(new_row("en", None)).unwrap();

        assert_eq!(store.find_all().unwrap().len(), 2);
    }

    #[test]
    fn test_update_patches_fields() {
        let store = MemoryRowStore::new();
        let created = store.create(new_row("en", Some("guide"))).unwrap();

        let updated = store
            .update(
                created.id,
                RowPatch {
                    group_id: Some(created.id),
                    visible: Some(false),
                    ..RowPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.group_id, Some(created.id));
        assert!(!updated.visible);
        // Untouched fields survive
        assert_eq!(updated.slug.as_deref(), Some("guide"));
    }

    #[test]
    fn test_update_missing_row_not_found() {
        let store = MemoryRowStore::new();

        let err = store.update(Uuid::new_v4(), RowPatch::default()).unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::NotFound);
    }

    #[test]
    fn test_reorder_applies_all_moves() {
        let store = MemoryRowStore::new();
        let a = store.create(new_row("en", Some("a"))).unwrap();
        let b = store.create(new_row("en", Some("b"))).unwrap();

        store
            .reorder(&[
                RowMove {
                    id: a.id,
                    parent_id: None,
                    order: 2,
                },
                RowMove {
                    id: b.id,
                    parent_id: Some(a.id),
                    order: 1,
                },
            ])
            .unwrap();

        let rows = store.find_all().unwrap();
        let a = rows.iter().find(|r| r.id == a.id).unwrap();
        let b = rows.iter().find(|r| r.id == b.id).unwrap();
        assert_eq!(a.order, 2);
        assert_eq!(b.parent_id, Some(a.id));
        assert_eq!(b.order, 1);
    }

    #[test]
    fn test_reorder_is_all_or_nothing() {
        let store = MemoryRowStore::new();
        let a = store.create(new_row("en", Some("a"))).unwrap();

        let err = store
            .reorder(&[
                RowMove {
                    id: a.id,
                    parent_id: None,
                    order: 9,
                },
                RowMove {
                    id: Uuid::new_v4(),
                    parent_id: None,
                    order: 1,
                },
            ])
            .unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        // First move was not applied either.
        let rows = store.find_all().unwrap();
        assert_eq!(rows[0].order, 0);
    }

    #[test]
    fn test_fail_reads() {
        let store = MemoryRowStore::new();
        store.set_fail_reads(true);

        let err = store.find_all().unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Unavailable);

        store.set_fail_reads(false);
        assert!(store.find_all().is_ok());
    }

    #[test]
    fn test_counters() {
        let store = MemoryRowStore::new();
        assert_eq!(store.read_count(), 0);
        assert_eq!(store.write_count(), 0);

        store.create(new_row("en", Some("a"))).unwrap();
        let _ = store.find_all().unwrap();
        let _ = store.find_all().unwrap();

        assert_eq!(store.read_count(), 2);
        assert_eq!(store.write_count(), 1);
    }
}
