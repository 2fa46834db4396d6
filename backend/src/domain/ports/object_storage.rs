//! Driven port for image object storage.

use async_trait::async_trait;
use url::Url;

use crate::domain::Error;

/// Blob storage keyed by `{user_id}/{unix_millis}-{filename}`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store the bytes under the given key and return the permanent public
    /// URL of the object.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<Url, Error>;

    /// Remove an object.
    ///
    /// Only used as compensation when a batch submit fails part-way.
    /// Removing an unknown key is not an error.
    async fn delete(&self, key: &str) -> Result<(), Error>;
}
