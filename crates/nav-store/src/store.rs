//! Row-store trait and error types.
//!
//! Provides the [`RowStore`] trait for abstracting row reads and writes,
//! along with [`StoreError`] for unified error handling across backends.
//!
//! The store is the single writer-of-record for navigation rows. Everything
//! the resolver caches is a derived, disposable projection of what the store
//! returns.

use uuid::Uuid;

use crate::row::{NewPageRow, PageRow, RowMove, RowPatch};

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Row does not exist.
    NotFound,
    /// A unique constraint was violated (e.g., `(slug, locale)`).
    Conflict,
    /// Row data failed validation.
    InvalidData,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (constraint violation, not found, invalid data).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (service unavailable).
    Persistent,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Row context (if applicable).
    pub row: Option<Uuid>,
    /// Backend identifier (e.g., "Memory", "Sql").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            row: None,
            backend: None,
            source: None,
        }
    }

    /// Attach row context.
    #[must_use]
    pub fn with_row(mut self, id: Uuid) -> Self {
        self.row = Some(id);
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not-found error with row context.
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::new(StoreErrorKind::NotFound).with_row(id)
    }

    /// Create a unique-constraint conflict error.
    #[must_use]
    pub fn conflict() -> Self {
        Self::new(StoreErrorKind::Conflict)
    }

    /// True when the error is a unique-constraint conflict.
    ///
    /// The locale-coverage pass tolerates these: a concurrent invocation
    /// already created the same row.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind == StoreErrorKind::Conflict
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (row: <id>)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::Conflict => "Conflict",
            StoreErrorKind::InvalidData => "Invalid data",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Timeout => "Timeout",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(row) = &self.row {
            write!(f, " (row: {row})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Row-store abstraction.
///
/// Implementations are expected to enforce a unique constraint on
/// `(slug, locale)` and surface violations as [`StoreErrorKind::Conflict`];
/// the coverage pass relies on that to resolve duplicate-synthesis races
/// without locking.
pub trait RowStore: Send + Sync {
    /// Read all page rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails. A failed read aborts the
    /// current tree build; no cache entry is written.
    fn find_all(&self) -> Result<Vec<PageRow>, StoreError>;

    /// Create a row, returning it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreErrorKind::Conflict`] error when the row would
    /// violate the `(slug, locale)` unique constraint.
    fn create(&self, row: NewPageRow) -> Result<PageRow, StoreError>;

    /// Apply a partial update to a row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::NotFound`] when the row does not exist.
    fn update(&self, id: Uuid, patch: RowPatch) -> Result<PageRow, StoreError>;

    /// Apply a reorder batch transactionally: either every move is applied
    /// or none is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::NotFound`] when any referenced row does not
    /// exist; in that case no move has been applied.
    fn reorder(&self, moves: &[RowMove]) -> Result<(), StoreError>;
}
