use std::collections::HashMap;
use std::sync::RwLock;

use storefront_catalog::CatalogItem;
use storefront_core::{AggregateRoot, BrandId, CatalogItemId, CategoryId, ExpectedVersion};

use super::r#trait::{Brand, Category, DocumentStore, StoreError};

/// In-memory versioned document store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    items: RwLock<HashMap<CatalogItemId, CatalogItem>>,
    categories: RwLock<Vec<Category>>,
    brands: RwLock<Vec<Brand>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category into the reference collection (test/dev helper).
    pub fn seed_category(&self, name: impl Into<String>) -> CategoryId {
        let id = CategoryId::new();
        self.categories
            .write()
            .expect("categories lock poisoned")
            .push(Category { id, name: name.into() });
        id
    }

    /// Seed a brand into the reference collection (test/dev helper).
    pub fn seed_brand(&self, name: impl Into<String>) -> BrandId {
        let id = BrandId::new();
        self.brands
            .write()
            .expect("brands lock poisoned")
            .push(Brand { id, name: name.into() });
        id
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, id: CatalogItemId) -> Result<Option<CatalogItem>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|_| StoreError::Unavailable("items lock poisoned".to_string()))?;
        Ok(items.get(&id).cloned())
    }

    fn put(&self, mut item: CatalogItem, expected: ExpectedVersion) -> Result<u64, StoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| StoreError::Unavailable("items lock poisoned".to_string()))?;

        let id = item.id_typed();
        let current = items.get(&id).map(|existing| existing.version()).unwrap_or(0);

        if !expected.matches(current) {
            return Err(StoreError::Concurrency(format!(
                "item {id}: expected {expected:?}, actual {current}"
            )));
        }

        let assigned = current + 1;
        item.set_version(assigned);
        items.insert(id, item);
        Ok(assigned)
    }

    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = self
            .categories
            .read()
            .map_err(|_| StoreError::Unavailable("categories lock poisoned".to_string()))?;
        Ok(categories.clone())
    }

    fn brands(&self) -> Result<Vec<Brand>, StoreError> {
        let brands = self
            .brands
            .read()
            .map_err(|_| StoreError::Unavailable("brands lock poisoned".to_string()))?;
        Ok(brands.clone())
    }
}
