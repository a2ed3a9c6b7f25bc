//! Post-commit domain event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CatalogItemId, UserId};
use storefront_events::Event;

use crate::item::{CatalogItem, ItemStatus};

/// Snapshot fact emitted after every successful publish/unpublish commit.
///
/// One upsert-style event for both transitions: consumers distinguish
/// publish from unpublish by the `published`/`status` fields inside the
/// payload, not by event type, and must treat deliveries as idempotent
/// upserts keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItemUpserted {
    pub id: CatalogItemId,
    pub name: String,
    pub sku: String,
    pub slug: String,
    pub price: u64,
    pub sale_price: Option<u64>,
    pub category_ids: Vec<String>,
    pub image_urls: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub status: ItemStatus,
    pub published: bool,
    pub created_on_utc: DateTime<Utc>,
    pub created_by: UserId,
    pub last_modified_on_utc: DateTime<Utc>,
    pub last_modified_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

impl CatalogItemUpserted {
    /// Snapshot the externally-relevant fields of the aggregate.
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            id: item.id_typed(),
            name: item.name().to_string(),
            sku: item.sku().to_string(),
            slug: item.slug().to_string(),
            price: item.price(),
            sale_price: item.sale_price(),
            category_ids: item.category_ids().iter().map(|id| id.to_string()).collect(),
            image_urls: item.images().iter().map(|img| img.public_url.clone()).collect(),
            thumbnail_url: item.thumbnail().map(|img| img.public_url.clone()),
            status: item.status(),
            published: item.published(),
            created_on_utc: item.created_on_utc(),
            created_by: item.created_by(),
            last_modified_on_utc: item.last_modified_on_utc(),
            last_modified_by: item.last_modified_by(),
            occurred_at: item.last_modified_on_utc(),
        }
    }
}

impl Event for CatalogItemUpserted {
    fn event_type(&self) -> &'static str {
        "catalog.item.upserted"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
