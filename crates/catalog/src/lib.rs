//! `storefront-catalog` — the catalog item aggregate and its write-side
//! contracts (commands, post-commit event, media value objects).

pub mod command;
pub mod event;
pub mod item;
pub mod media;
pub mod slug;

pub use command::{CatalogCommand, CreateItem, PublishItem, SyncCommand, UnpublishItem, UpdateItem};
pub use event::CatalogItemUpserted;
pub use item::{CatalogItem, ItemAttributes, ItemStatus, MIN_PRICE_MINOR};
pub use media::{MediaDescriptor, RawFile};
pub use slug::slugify;
