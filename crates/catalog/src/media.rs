//! Media value objects.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::ValueObject;

/// A staged media asset: the durable descriptor returned by the media staging
/// collaborator after a raw payload has been uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub file_id: Uuid,
    pub original_name: String,
    pub stored_name: String,
    pub public_url: String,
}

impl ValueObject for MediaDescriptor {}

/// A raw binary payload awaiting staging (not yet durable).
#[derive(Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl core::fmt::Debug for RawFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
