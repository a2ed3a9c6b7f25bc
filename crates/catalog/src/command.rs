//! Command DTOs for the write-side handlers.
//!
//! Cross-cutting request validation lives here as explicit `validate()`
//! functions that run before the handler body, so that client errors are
//! reported before any staging or persistence work starts.

use serde::{Deserialize, Serialize};

use storefront_core::{CatalogItemId, DomainError, DomainResult, UserId};

use crate::item::ItemAttributes;
use crate::media::RawFile;

/// Create a new catalog item.
///
/// The caller supplies the item id so that a rejected command leaves no trace
/// that could collide with a retry.
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub item_id: CatalogItemId,
    pub attributes: ItemAttributes,
    /// Raw thumbnail payload; mandatory for create.
    pub thumbnail: Option<RawFile>,
    /// Raw gallery image payloads.
    pub images: Vec<RawFile>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub featured: bool,
    pub barcode: Option<String>,
    pub unit: Option<String>,
    pub weight_grams: Option<u64>,
    /// Publish in the same operation (initial state is unpublished otherwise).
    pub publish: bool,
    pub performed_by: UserId,
}

impl CreateItem {
    /// Pre-handler validation: constraints the aggregate cannot see.
    pub fn validate(&self) -> DomainResult<()> {
        if self.thumbnail.is_none() {
            return Err(DomainError::validation("thumbnail is required".to_string()));
        }
        Ok(())
    }
}

/// Replace the state of an existing catalog item.
///
/// Full-replacement semantics; images are expressed as retain + add.
#[derive(Debug, Clone)]
pub struct UpdateItem {
    pub item_id: CatalogItemId,
    pub attributes: ItemAttributes,
    /// Replacement thumbnail payload; the existing one is kept when absent.
    pub thumbnail: Option<RawFile>,
    /// Newly uploaded gallery image payloads.
    pub images: Vec<RawFile>,
    /// Public URLs of existing images to keep; everything else is dropped.
    pub retained_image_urls: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub featured: bool,
    pub barcode: Option<String>,
    pub unit: Option<String>,
    pub weight_grams: Option<u64>,
    /// Requested publication state; the matching side-effect command is
    /// always dispatched, whether or not the state actually changes.
    pub publish: bool,
    pub performed_by: UserId,
}

/// Publish an item (also issued as a side-effect command after create/update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishItem {
    pub item_id: CatalogItemId,
    pub performed_by: UserId,
}

/// Unpublish an item (also issued as a side-effect command after update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpublishItem {
    pub item_id: CatalogItemId,
    pub performed_by: UserId,
}

/// The write-side command set, routed by the handler registry.
#[derive(Debug, Clone)]
pub enum CatalogCommand {
    Create(CreateItem),
    Update(UpdateItem),
    Publish(PublishItem),
    Unpublish(UnpublishItem),
}

impl CatalogCommand {
    pub fn item_id(&self) -> CatalogItemId {
        match self {
            CatalogCommand::Create(cmd) => cmd.item_id,
            CatalogCommand::Update(cmd) => cmd.item_id,
            CatalogCommand::Publish(cmd) => cmd.item_id,
            CatalogCommand::Unpublish(cmd) => cmd.item_id,
        }
    }
}

/// Side-effect command: issued after a successful create/update so a
/// downstream synchronization pass reconciles external read models.
///
/// Distinct from the domain event: the event is the post-commit fact, this is
/// the follow-up intent that re-enters the Publish/Unpublish handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncCommand {
    Publish { item_id: CatalogItemId, performed_by: UserId },
    Unpublish { item_id: CatalogItemId, performed_by: UserId },
}

impl storefront_events::Command for SyncCommand {
    fn target_item_id(&self) -> CatalogItemId {
        match self {
            SyncCommand::Publish { item_id, .. } | SyncCommand::Unpublish { item_id, .. } => *item_id,
        }
    }
}

impl From<SyncCommand> for CatalogCommand {
    fn from(value: SyncCommand) -> Self {
        match value {
            SyncCommand::Publish { item_id, performed_by } => {
                CatalogCommand::Publish(PublishItem { item_id, performed_by })
            }
            SyncCommand::Unpublish { item_id, performed_by } => {
                CatalogCommand::Unpublish(UnpublishItem { item_id, performed_by })
            }
        }
    }
}
