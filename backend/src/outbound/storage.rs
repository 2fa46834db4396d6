//! Object storage adapters.
//!
//! Keys look like `{user_id}/{unix_millis}-{filename}`; the public URL of
//! an object is the configured base joined with its key.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use url::Url;

use crate::domain::Error;
use crate::domain::ports::ObjectStorage;

fn joinable(mut base: Url) -> Url {
    // `Url::join` drops the last path segment unless the base ends in '/'.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn public_url(base: &Url, key: &str) -> Result<Url, Error> {
    base.join(key)
        .map_err(|_| Error::internal(format!("storage key {key} does not form a valid URL")))
}

/// Base URL reported for objects held by [`MemoryObjectStorage`].
const MEMORY_BASE: &str = "https://storage.test/";

/// Object store backed by a mutex-guarded map, for development and tests.
#[derive(Default)]
pub struct MemoryObjectStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, Error> {
        self.objects
            .lock()
            .map_err(|_| Error::internal("object storage state is poisoned"))
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<Url, Error> {
        let mut objects = self.lock()?;
        objects.insert(key.to_owned(), bytes.to_vec());
        let base = Url::parse(MEMORY_BASE)
            .map_err(|_| Error::internal("memory storage base URL is invalid"))?;
        public_url(&base, key)
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let mut objects = self.lock()?;
        objects.remove(key);
        Ok(())
    }
}

/// Object store writing into a directory through a capability handle.
///
/// The handle is opened once at startup; every path operation is resolved
/// relative to it, so key tampering cannot escape the storage root.
pub struct DirObjectStorage {
    root: Dir,
    public_base: Url,
}

impl DirObjectStorage {
    /// Open the storage root and remember the public base URL objects are
    /// served from.
    pub fn open(path: impl AsRef<Path>, public_base: Url) -> Result<Self, Error> {
        let root = Dir::open_ambient_dir(path.as_ref(), ambient_authority()).map_err(|err| {
            Error::service_unavailable(format!(
                "cannot open storage root {}: {err}",
                path.as_ref().display()
            ))
        })?;
        Ok(Self {
            root,
            public_base: joinable(public_base),
        })
    }
}

#[async_trait]
impl ObjectStorage for DirObjectStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<Url, Error> {
        if let Some((parent, _)) = key.rsplit_once('/') {
            self.root
                .create_dir_all(parent)
                .map_err(|_| Error::service_unavailable("object storage unavailable"))?;
        }
        self.root
            .write(key, bytes)
            .map_err(|_| Error::service_unavailable("object storage unavailable"))?;
        public_url(&self.public_base, key)
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        match self.root.remove_file(key) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(_) => Err(Error::service_unavailable("object storage unavailable")),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn memory_put_returns_a_key_derived_url() {
        let storage = MemoryObjectStorage::new();
        let url = storage
            .put("user-1/123-a.jpg", b"bytes")
            .await
            .expect("stored");
        assert_eq!(url.as_str(), "https://storage.test/user-1/123-a.jpg");
        assert_eq!(storage.keys(), vec!["user-1/123-a.jpg".to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn memory_delete_is_idempotent() {
        let storage = MemoryObjectStorage::new();
        storage.put("k", b"bytes").await.expect("stored");
        storage.delete("k").await.expect("deleted");
        storage.delete("k").await.expect("second delete is a no-op");
        assert!(storage.keys().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn dir_storage_writes_under_the_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = Url::parse("https://photos.example.com/media").expect("valid url");
        let storage = DirObjectStorage::open(dir.path(), base).expect("opens");

        let url = storage
            .put("user-1/123-a.jpg", b"bytes")
            .await
            .expect("stored");
        assert_eq!(
            url.as_str(),
            "https://photos.example.com/media/user-1/123-a.jpg"
        );

        let written = std::fs::read(dir.path().join("user-1/123-a.jpg")).expect("file exists");
        assert_eq!(written, b"bytes");
    }

    #[rstest]
    #[tokio::test]
    async fn dir_delete_tolerates_missing_objects() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = Url::parse("https://photos.example.com/").expect("valid url");
        let storage = DirObjectStorage::open(dir.path(), base).expect("opens");

        storage.delete("user-1/123-a.jpg").await.expect("no-op delete");
    }
}
