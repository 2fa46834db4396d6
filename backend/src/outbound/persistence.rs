//! In-memory repositories for profiles and photos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{PhotoRepository, ProfileRepository};
use crate::domain::{Error, Photo, PhotoId, Profile, UserId};

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, Error> {
    mutex
        .lock()
        .map_err(|_| Error::internal(format!("{what} state is poisoned")))
}

/// Profile store backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryProfileRepository {
    profiles: Mutex<HashMap<UserId, Profile>>,
}

impl MemoryProfileRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn insert(&self, profile: &Profile) -> Result<(), Error> {
        let mut profiles = lock(&self.profiles, "profile")?;
        if profiles.contains_key(profile.user_id()) {
            return Err(Error::conflict("a profile already exists for this user"));
        }
        profiles.insert(profile.user_id().clone(), profile.clone());
        Ok(())
    }

    async fn find(&self, user: &UserId) -> Result<Option<Profile>, Error> {
        let profiles = lock(&self.profiles, "profile")?;
        Ok(profiles.get(user).cloned())
    }

    async fn find_many(&self, users: &[UserId]) -> Result<Vec<Profile>, Error> {
        let profiles = lock(&self.profiles, "profile")?;
        Ok(users
            .iter()
            .filter_map(|user| profiles.get(user).cloned())
            .collect())
    }
}

/// Photo store backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryPhotoRepository {
    photos: Mutex<HashMap<PhotoId, Photo>>,
}

impl MemoryPhotoRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhotoRepository for MemoryPhotoRepository {
    async fn insert(&self, photo: &Photo) -> Result<(), Error> {
        let mut photos = lock(&self.photos, "photo")?;
        photos.insert(photo.id().clone(), photo.clone());
        Ok(())
    }

    async fn delete(&self, id: &PhotoId) -> Result<(), Error> {
        let mut photos = lock(&self.photos, "photo")?;
        photos.remove(id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Photo>, Error> {
        let photos = lock(&self.photos, "photo")?;
        Ok(photos.values().cloned().collect())
    }
}
