//! Row model and row-store abstraction for the navigation engine.
//!
//! This crate defines the flat row representation of the navigation tree
//! ([`PageRow`]) and the [`RowStore`] trait through which the resolver reads
//! and writes rows. The relational store itself lives behind the trait;
//! consumers never see SQL or connection handling.
//!
//! # Row Convention
//!
//! Every row is one locale-specific instance of a logical navigational
//! entry. Rows sharing a `group_id` form a *group*: the same entry
//! translated into each locale. `parent_id` always references a row in the
//! **same locale**; cross-locale parent resolution goes through the parent's
//! group.

mod row;
mod store;

#[cfg(feature = "mock")]
mod memory;

#[cfg(feature = "mock")]
pub use memory::MemoryRowStore;
pub use row::{NewPageRow, PageKind, PageRow, RowMove, RowPatch};
pub use store::{ErrorStatus, RowStore, StoreError, StoreErrorKind};
