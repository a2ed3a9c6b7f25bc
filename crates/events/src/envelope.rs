use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::CatalogItemId;

/// Envelope for a published event, carrying aggregate/stream metadata.
///
/// This is the unit the handlers hand to the event publisher after a
/// successful commit. The broker wire format beyond this shape is out of
/// scope; consumers key idempotent upserts off `item_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    item_id: CatalogItemId,
    aggregate_type: String,

    event_type: String,
    occurred_at: DateTime<Utc>,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        item_id: CatalogItemId,
        aggregate_type: impl Into<String>,
        event_type: impl Into<String>,
        occurred_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            item_id,
            aggregate_type: aggregate_type.into(),
            event_type: event_type.into(),
            occurred_at,
            payload,
        }
    }

    /// Wrap a typed event, capturing its metadata.
    pub fn from_typed(item_id: CatalogItemId, aggregate_type: impl Into<String>, payload: E) -> Self
    where
        E: crate::Event,
    {
        Self {
            event_id: Uuid::now_v7(),
            item_id,
            aggregate_type: aggregate_type.into(),
            event_type: payload.event_type().to_string(),
            occurred_at: payload.occurred_at(),
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn item_id(&self) -> CatalogItemId {
        self.item_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
