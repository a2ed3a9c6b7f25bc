//! Existence checks for foreign identifiers (categories, brands).

use std::collections::BTreeSet;

use thiserror::Error;

use storefront_core::{BrandId, CategoryId};

use crate::document_store::{DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum ReferenceError {
    /// One or more candidate ids do not exist in the authoritative collection.
    #[error("invalid references: {0:?}")]
    Invalid(Vec<String>),

    /// The reference collections could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Confirms candidate foreign identifiers against the authoritative
/// collections. Read-only; runs inside the write path before any mutation.
///
/// Reads the full collections and computes a set difference - correctness
/// over latency, and no caching so a reference created in the same unit of
/// work is visible.
pub struct ReferenceValidator<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> ReferenceValidator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Every candidate category id must exist; reports all offenders at once.
    pub fn validate_categories(&self, ids: &BTreeSet<CategoryId>) -> Result<(), ReferenceError> {
        if ids.is_empty() {
            return Ok(());
        }

        let known: BTreeSet<CategoryId> = self.store.categories()?.into_iter().map(|c| c.id).collect();
        let missing: Vec<String> = ids.difference(&known).map(|id| id.to_string()).collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReferenceError::Invalid(missing))
        }
    }

    /// The brand id, if supplied, must exist.
    pub fn validate_brand(&self, id: Option<BrandId>) -> Result<(), ReferenceError> {
        let Some(id) = id else {
            return Ok(());
        };

        if self.store.brands()?.iter().any(|b| b.id == id) {
            Ok(())
        } else {
            Err(ReferenceError::Invalid(vec![id.to_string()]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::InMemoryDocumentStore;

    #[test]
    fn empty_candidate_set_is_valid() {
        let store = InMemoryDocumentStore::new();
        let validator = ReferenceValidator::new(&store);

        assert!(validator.validate_categories(&BTreeSet::new()).is_ok());
        assert!(validator.validate_brand(None).is_ok());
    }

    #[test]
    fn known_references_are_accepted() {
        let store = InMemoryDocumentStore::new();
        let shirts = store.seed_category("Shirts");
        let brand = store.seed_brand("Acme");
        let validator = ReferenceValidator::new(&store);

        let mut ids = BTreeSet::new();
        ids.insert(shirts);
        assert!(validator.validate_categories(&ids).is_ok());
        assert!(validator.validate_brand(Some(brand)).is_ok());
    }

    #[test]
    fn all_offending_category_ids_are_reported() {
        let store = InMemoryDocumentStore::new();
        let shirts = store.seed_category("Shirts");
        let validator = ReferenceValidator::new(&store);

        let ghost_a = CategoryId::new();
        let ghost_b = CategoryId::new();
        let mut ids = BTreeSet::new();
        ids.insert(shirts);
        ids.insert(ghost_a);
        ids.insert(ghost_b);

        let err = validator.validate_categories(&ids).unwrap_err();
        match err {
            ReferenceError::Invalid(missing) => {
                assert_eq!(missing.len(), 2);
                assert!(missing.contains(&ghost_a.to_string()));
                assert!(missing.contains(&ghost_b.to_string()));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn unknown_brand_is_rejected() {
        let store = InMemoryDocumentStore::new();
        store.seed_brand("Acme");
        let validator = ReferenceValidator::new(&store);

        let ghost = BrandId::new();
        let err = validator.validate_brand(Some(ghost)).unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(ids) if ids == vec![ghost.to_string()]));
    }
}
