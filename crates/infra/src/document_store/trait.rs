use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use storefront_catalog::CatalogItem;
use storefront_core::{BrandId, CatalogItemId, CategoryId, ExpectedVersion};

/// Reference entity: a category another aggregate may point at.
///
/// Owned by the same service but outside the catalog item's consistency
/// boundary; the write side only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Reference entity: a brand another aggregate may point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

/// Document store operation error.
///
/// Infrastructure failures only; domain failures (validation, invariants)
/// never originate here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("invalid write: {0}")]
    InvalidWrite(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Versioned document store for catalog items, plus bulk read access to the
/// reference collections.
///
/// ## Write semantics
///
/// `put()` is the single transactional store call per command: it checks the
/// caller's `ExpectedVersion` against the current version (0 for an absent
/// document), assigns `current + 1`, and persists the whole aggregate
/// atomically. A stale expectation fails with `StoreError::Concurrency`; the
/// caller's infrastructure retries the command from the top with fresh reads.
///
/// ## Read semantics
///
/// `get()` returns the current document with its committed version, or `None`
/// for an unknown id. `categories()`/`brands()` are read-only bulk fetches
/// used for existence-set computation; reads go through the same handle
/// writes commit to, so a command always sees its own prior writes.
pub trait DocumentStore: Send + Sync {
    /// Load the current document, if any. The returned aggregate carries the
    /// version observed at load time.
    fn get(&self, id: CatalogItemId) -> Result<Option<CatalogItem>, StoreError>;

    /// Persist the aggregate under optimistic concurrency; returns the newly
    /// assigned version.
    fn put(&self, item: CatalogItem, expected: ExpectedVersion) -> Result<u64, StoreError>;

    /// Bulk fetch of all categories (no pagination assumed at this scale).
    fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Bulk fetch of all brands.
    fn brands(&self) -> Result<Vec<Brand>, StoreError>;
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn get(&self, id: CatalogItemId) -> Result<Option<CatalogItem>, StoreError> {
        (**self).get(id)
    }

    fn put(&self, item: CatalogItem, expected: ExpectedVersion) -> Result<u64, StoreError> {
        (**self).put(item, expected)
    }

    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).categories()
    }

    fn brands(&self) -> Result<Vec<Brand>, StoreError> {
        (**self).brands()
    }
}
