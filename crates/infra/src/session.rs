//! Unit-of-work around one aggregate load-mutate-store cycle.

use storefront_catalog::CatalogItem;
use storefront_core::{AggregateRoot, CatalogItemId, ExpectedVersion};

use crate::document_store::{DocumentStore, StoreError};

/// A transactional boundary scoped to a single catalog item.
///
/// The session records the version observed when the aggregate was loaded and
/// carries it into the commit as the optimistic concurrency expectation. An
/// aggregate staged without a prior load is treated as new (expected version
/// 0), so concurrent creates of the same id also conflict.
///
/// One aggregate per session; no cross-aggregate transactions are taken.
/// Reference reads (categories/brands) go through the same store handle, so
/// the validator sees the session's transactional view.
pub struct CatalogSession<'s, S: DocumentStore> {
    store: &'s S,
    observed: Option<(CatalogItemId, u64)>,
    staged: Option<CatalogItem>,
}

impl<'s, S: DocumentStore> CatalogSession<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            observed: None,
            staged: None,
        }
    }

    /// Load an aggregate and record its version for the commit-time check.
    pub fn load(&mut self, id: CatalogItemId) -> Result<Option<CatalogItem>, StoreError> {
        let item = self.store.get(id)?;
        if let Some(item) = &item {
            self.observed = Some((id, item.version()));
        }
        Ok(item)
    }

    /// Stage the aggregate for commit. Replaces any previously staged state.
    pub fn store(&mut self, item: CatalogItem) {
        self.staged = Some(item);
    }

    /// Commit the staged aggregate in a single optimistic store call.
    ///
    /// Returns the newly assigned version. Fails with
    /// `StoreError::Concurrency` when another writer got there first; callers
    /// retry the whole command from the top (fresh load, re-validation).
    pub fn commit(self) -> Result<u64, StoreError> {
        let item = self
            .staged
            .ok_or_else(|| StoreError::InvalidWrite("commit with nothing staged".to_string()))?;

        let expected = match self.observed {
            Some((id, version)) if id == item.id_typed() => ExpectedVersion::Exact(version),
            _ => ExpectedVersion::Exact(0),
        };

        self.store.put(item, expected)
    }
}
