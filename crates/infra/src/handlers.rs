//! Write-side command handlers (application-level orchestration).
//!
//! One handler per mutation intent, each running a fixed sequence inside a
//! single-aggregate unit of work:
//!
//! ```text
//! Command
//!   ↓
//! 1. Pre-handler command validation (client errors surface first)
//!   ↓
//! 2. Reference validation (categories/brands must exist now)
//!   ↓
//! 3. Media staging (out-of-transaction, before any persistence)
//!   ↓
//! 4. Aggregate construction/mutation (slug, audit, invariants)
//!   ↓
//! 5. Session commit (single optimistic store call)
//!   ↓
//! 6. Post-commit: event emission + side-effect command dispatch
//! ```
//!
//! Event emission and side-effect dispatch are not atomic with the commit
//! (classic dual-write risk). The mitigation: they run only after a
//! successful commit, and every publish/unpublish invocation unconditionally
//! re-emits, so at-least-once delivery plus idempotent consumers is enough.
//! Handlers never retry `Concurrency` themselves; the caller's infrastructure
//! retries the whole command from the top.

use thiserror::Error;
use tracing::{debug, info};

use storefront_catalog::{
    CatalogCommand, CatalogItem, CatalogItemUpserted, CreateItem, PublishItem, SyncCommand,
    UnpublishItem, UpdateItem,
};
use storefront_core::{CatalogItemId, DomainError};
use storefront_events::{EventBus, EventEnvelope};

use crate::document_store::{DocumentStore, StoreError};
use crate::media::{MediaStaging, StagingError};
use crate::references::{ReferenceError, ReferenceValidator};
use crate::session::CatalogSession;

/// Bucket all catalog media is staged into.
pub const MEDIA_BUCKET: &str = "catalog-items";

const AGGREGATE_TYPE: &str = "catalog.item";

/// Command execution failure taxonomy.
///
/// `Validation`/`InvalidReferences`/`NotFound` are client errors and are
/// never retried. `Concurrency` is retryable by the caller with fresh reads.
/// `Staging` aborts before any persistence. `Publish` means the state change
/// committed but the post-commit fact was not delivered; re-running the
/// command is safe.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid references: {0:?}")]
    InvalidReferences(Vec<String>),

    #[error("not found")]
    NotFound,

    #[error("optimistic concurrency conflict: {0}")]
    Concurrency(String),

    #[error("media staging failed: {0}")]
    Staging(#[from] StagingError),

    #[error("store failure: {0}")]
    Store(StoreError),

    #[error("event publication failed after commit: {0}")]
    Publish(String),
}

impl From<DomainError> for CommandError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => CommandError::Validation(msg),
            DomainError::InvalidReferences(ids) => CommandError::InvalidReferences(ids),
            DomainError::InvalidId(msg) => CommandError::Validation(msg),
            DomainError::NotFound => CommandError::NotFound,
            DomainError::Conflict(msg) => CommandError::Concurrency(msg),
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Concurrency(msg) => CommandError::Concurrency(msg),
            other => CommandError::Store(other),
        }
    }
}

impl From<ReferenceError> for CommandError {
    fn from(value: ReferenceError) -> Self {
        match value {
            ReferenceError::Invalid(ids) => CommandError::InvalidReferences(ids),
            ReferenceError::Store(err) => err.into(),
        }
    }
}

/// Command-handler registry for the catalog write side.
///
/// Holds the three collaborators every handler needs: the document store
/// (transactional state), the event publisher (post-commit facts), and the
/// media staging collaborator (binary uploads). Routing is an explicit match,
/// not a reflection pipeline; the side-effect `SyncCommand` issued after
/// create/update re-enters `handle` and closes the synchronization loop.
pub struct CatalogHandlers<S, B, M> {
    store: S,
    bus: B,
    media: M,
}

impl<S, B, M> CatalogHandlers<S, B, M>
where
    S: DocumentStore,
    B: EventBus<EventEnvelope<CatalogItemUpserted>>,
    M: MediaStaging,
{
    pub fn new(store: S, bus: B, media: M) -> Self {
        Self { store, bus, media }
    }

    /// Route a command to its handler.
    pub fn handle(&self, command: CatalogCommand) -> Result<CatalogItemId, CommandError> {
        match command {
            CatalogCommand::Create(cmd) => self.create(cmd),
            CatalogCommand::Update(cmd) => self.update(cmd),
            CatalogCommand::Publish(cmd) => self.publish(cmd),
            CatalogCommand::Unpublish(cmd) => self.unpublish(cmd),
        }
    }

    fn create(&self, cmd: CreateItem) -> Result<CatalogItemId, CommandError> {
        cmd.validate()?;

        let validator = ReferenceValidator::new(&self.store);
        validator.validate_categories(&cmd.attributes.category_ids)?;
        validator.validate_brand(cmd.attributes.brand_id)?;

        let actor = cmd.performed_by;
        let mut item = CatalogItem::create(cmd.item_id, cmd.attributes, actor)?;

        // Staging happens before the transactional write; a failure here
        // leaves nothing persisted. `validate()` guaranteed the thumbnail.
        if let Some(raw) = cmd.thumbnail {
            let staged = self.media.stage(vec![raw], MEDIA_BUCKET, true)?;
            item.add_or_update_thumbnail(staged.into_iter().next(), actor);
        }
        if !cmd.images.is_empty() {
            let staged = self.media.stage(cmd.images, MEDIA_BUCKET, true)?;
            item.add_or_update_images(staged, &[], actor);
        }

        item.update_colors(cmd.colors, actor);
        item.update_sizes(cmd.sizes, actor);
        item.update_tags(cmd.tags, actor);
        item.update_seo(cmd.seo_title, cmd.seo_description, actor);
        item.update_featured(cmd.featured, actor);
        item.update_barcode(cmd.barcode, actor);
        item.update_unit_and_weight(cmd.unit, cmd.weight_grams, actor);

        if cmd.publish {
            item.publish(actor);
        }

        let mut session = CatalogSession::new(&self.store);
        session.store(item);
        let version = session.commit()?;
        info!(item_id = %cmd.item_id, version, "catalog item created");

        if cmd.publish {
            self.dispatch_sync(SyncCommand::Publish {
                item_id: cmd.item_id,
                performed_by: actor,
            })?;
        }

        Ok(cmd.item_id)
    }

    fn update(&self, cmd: UpdateItem) -> Result<CatalogItemId, CommandError> {
        let mut session = CatalogSession::new(&self.store);
        let mut item = session.load(cmd.item_id)?.ok_or(CommandError::NotFound)?;

        let validator = ReferenceValidator::new(&self.store);
        validator.validate_categories(&cmd.attributes.category_ids)?;
        validator.validate_brand(cmd.attributes.brand_id)?;

        let actor = cmd.performed_by;
        item.update(cmd.attributes, actor)?;

        if let Some(raw) = cmd.thumbnail {
            let staged = self.media.stage(vec![raw], MEDIA_BUCKET, true)?;
            item.add_or_update_thumbnail(staged.into_iter().next(), actor);
        }

        // Retain/replace/add: the retained subset of existing images plus any
        // freshly staged uploads.
        let new_images = if cmd.images.is_empty() {
            Vec::new()
        } else {
            self.media.stage(cmd.images, MEDIA_BUCKET, true)?
        };
        item.add_or_update_images(new_images, &cmd.retained_image_urls, actor);

        item.update_colors(cmd.colors, actor);
        item.update_sizes(cmd.sizes, actor);
        item.update_tags(cmd.tags, actor);
        item.update_seo(cmd.seo_title, cmd.seo_description, actor);
        item.update_featured(cmd.featured, actor);
        item.update_barcode(cmd.barcode, actor);
        item.update_unit_and_weight(cmd.unit, cmd.weight_grams, actor);

        if cmd.publish {
            item.publish(actor);
        } else {
            item.unpublish(actor);
        }

        session.store(item);
        let version = session.commit()?;
        info!(item_id = %cmd.item_id, version, "catalog item updated");

        // Every update re-synchronizes downstream state: exactly one of
        // Publish/Unpublish is dispatched, matching the requested state, even
        // when the publication flag did not change.
        let sync = if cmd.publish {
            SyncCommand::Publish {
                item_id: cmd.item_id,
                performed_by: actor,
            }
        } else {
            SyncCommand::Unpublish {
                item_id: cmd.item_id,
                performed_by: actor,
            }
        };
        self.dispatch_sync(sync)?;

        Ok(cmd.item_id)
    }

    fn publish(&self, cmd: PublishItem) -> Result<CatalogItemId, CommandError> {
        let mut session = CatalogSession::new(&self.store);
        let mut item = session.load(cmd.item_id)?.ok_or(CommandError::NotFound)?;

        item.publish(cmd.performed_by);

        let snapshot = CatalogItemUpserted::from_item(&item);
        session.store(item);
        session.commit()?;
        info!(item_id = %cmd.item_id, "catalog item published");

        self.emit(cmd.item_id, snapshot)?;
        Ok(cmd.item_id)
    }

    fn unpublish(&self, cmd: UnpublishItem) -> Result<CatalogItemId, CommandError> {
        let mut session = CatalogSession::new(&self.store);
        let mut item = session.load(cmd.item_id)?.ok_or(CommandError::NotFound)?;

        item.unpublish(cmd.performed_by);

        let snapshot = CatalogItemUpserted::from_item(&item);
        session.store(item);
        session.commit()?;
        info!(item_id = %cmd.item_id, "catalog item unpublished");

        self.emit(cmd.item_id, snapshot)?;
        Ok(cmd.item_id)
    }

    /// Emit the post-commit fact. Runs strictly after a successful commit.
    fn emit(&self, item_id: CatalogItemId, event: CatalogItemUpserted) -> Result<(), CommandError> {
        let envelope = EventEnvelope::from_typed(item_id, AGGREGATE_TYPE, event);
        self.bus
            .publish(envelope)
            .map_err(|e| CommandError::Publish(format!("{e:?}")))
    }

    /// Explicit internal dispatch of the side-effect command back into the
    /// registry. Runs as its own unit of work, so the publish/unpublish
    /// handler re-loads, re-stamps, and re-emits even for no-op transitions.
    fn dispatch_sync(&self, command: SyncCommand) -> Result<CatalogItemId, CommandError> {
        debug!(?command, "dispatching side-effect command");
        self.handle(command.into())
    }
}
