//! Versioned document persistence for catalog items.

mod in_memory;
mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{Brand, Category, DocumentStore, StoreError};
