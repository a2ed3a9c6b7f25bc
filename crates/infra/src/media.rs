//! Media staging collaborator (binary upload seam).
//!
//! Staging is an out-of-transaction side effect performed before the
//! transactional write: a staging failure aborts the command before anything
//! is persisted, while a successful staging followed by a failed commit only
//! leaves orphaned blobs behind (content-addressed and immutable, cleaned up
//! by a background concern, not a correctness issue here).

use std::sync::{Arc, RwLock};

use thiserror::Error;
use uuid::Uuid;

use storefront_catalog::{MediaDescriptor, RawFile};

#[derive(Debug, Error)]
pub enum StagingError {
    /// The collaborator rejected a payload.
    #[error("payload rejected: {name}: {reason}")]
    Rejected { name: String, reason: String },

    /// The collaborator is unreachable.
    #[error("staging unavailable: {0}")]
    Unavailable(String),
}

/// Accepts raw byte payloads and returns durable descriptors.
///
/// Called once per command with the full batch of pending uploads; errors
/// propagate as command failures.
pub trait MediaStaging: Send + Sync {
    fn stage(
        &self,
        files: Vec<RawFile>,
        bucket: &str,
        public: bool,
    ) -> Result<Vec<MediaDescriptor>, StagingError>;
}

impl<M> MediaStaging for Arc<M>
where
    M: MediaStaging + ?Sized,
{
    fn stage(
        &self,
        files: Vec<RawFile>,
        bucket: &str,
        public: bool,
    ) -> Result<Vec<MediaDescriptor>, StagingError> {
        (**self).stage(files, bucket, public)
    }
}

/// In-memory media staging for tests/dev.
///
/// Assigns uuid-based stored names and cdn-style public URLs. Rejects empty
/// payloads, which doubles as the failure path in tests.
#[derive(Debug)]
pub struct InMemoryMediaStaging {
    base_url: String,
    staged: RwLock<Vec<MediaDescriptor>>,
}

impl InMemoryMediaStaging {
    pub fn new() -> Self {
        Self::with_base_url("https://cdn.local")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            staged: RwLock::new(Vec::new()),
        }
    }

    /// Number of blobs staged so far, including orphans from failed commits.
    pub fn staged_count(&self) -> usize {
        self.staged.read().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for InMemoryMediaStaging {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaStaging for InMemoryMediaStaging {
    fn stage(
        &self,
        files: Vec<RawFile>,
        bucket: &str,
        _public: bool,
    ) -> Result<Vec<MediaDescriptor>, StagingError> {
        let mut descriptors = Vec::with_capacity(files.len());

        for file in files {
            if file.bytes.is_empty() {
                return Err(StagingError::Rejected {
                    name: file.name,
                    reason: "empty payload".to_string(),
                });
            }

            let file_id = Uuid::now_v7();
            let stored_name = format!("{file_id}-{}", file.name);
            descriptors.push(MediaDescriptor {
                file_id,
                original_name: file.name,
                public_url: format!("{}/{bucket}/{stored_name}", self.base_url),
                stored_name,
            });
        }

        let mut staged = self
            .staged
            .write()
            .map_err(|_| StagingError::Unavailable("staging lock poisoned".to_string()))?;
        staged.extend(descriptors.clone());

        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_assigns_durable_identifiers() {
        let staging = InMemoryMediaStaging::new();
        let descriptors = staging
            .stage(
                vec![RawFile::new("a.png", vec![1]), RawFile::new("b.png", vec![2])],
                "catalog-items",
                true,
            )
            .unwrap();

        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].original_name, "a.png");
        assert!(descriptors[0].public_url.contains("/catalog-items/"));
        assert_ne!(descriptors[0].file_id, descriptors[1].file_id);
        assert_eq!(staging.staged_count(), 2);
    }

    #[test]
    fn empty_payload_fails_the_whole_batch() {
        let staging = InMemoryMediaStaging::new();
        let err = staging
            .stage(
                vec![RawFile::new("ok.png", vec![1]), RawFile::new("broken.png", vec![])],
                "catalog-items",
                true,
            )
            .unwrap_err();

        assert!(matches!(err, StagingError::Rejected { .. }));
        assert_eq!(staging.staged_count(), 0);
    }
}
