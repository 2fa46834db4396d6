//! Driven port for photo persistence.

use async_trait::async_trait;

use crate::domain::{Error, Photo, PhotoId};

/// Storage for persisted photo records.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Persist a new photo record.
    async fn insert(&self, photo: &Photo) -> Result<(), Error>;

    /// Delete a photo record.
    ///
    /// Only used as compensation when a batch submit fails part-way; the
    /// public API never deletes photos. Deleting an unknown id is not an
    /// error.
    async fn delete(&self, id: &PhotoId) -> Result<(), Error>;

    /// Return every photo. No ordering is guaranteed; the feed service
    /// sorts.
    async fn list_all(&self) -> Result<Vec<Photo>, Error>;
}
