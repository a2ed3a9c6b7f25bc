use storefront_core::CatalogItemId;

/// A command targets a specific aggregate (command abstraction).
///
/// Commands represent **intent** - a request to perform an action on an
/// aggregate. They are transient: a command is either rejected (validation)
/// or turns into a committed state change plus a post-commit event.
///
/// Commands must specify which aggregate they target via `target_item_id()`,
/// so infrastructure can route them and so each command stays inside one
/// transactional boundary. Different aggregates process commands concurrently;
/// commands for the same aggregate are serialized by the store's optimistic
/// concurrency check.
///
/// Commands must be `Clone + Send + Sync + 'static`: they may be copied for
/// retries and logging, and they cross thread boundaries.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_item_id(&self) -> CatalogItemId;
}
