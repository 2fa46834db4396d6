//! Feed service: the joined, ordered view of the shared gallery.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::photo::{FeedAuthor, FeedPhoto};
use super::ports::{FeedQuery, PhotoRepository, ProfileRepository};
use super::user::Profile;
use super::{Error, UserId};

/// Joins photos with author profiles and imposes the feed ordering.
///
/// Ordering is total and deterministic: newest `created_at` first, with the
/// photo id breaking ties, so two reads of unchanged data always agree.
pub struct FeedService {
    photos: Arc<dyn PhotoRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl FeedService {
    /// Wire the service to its driven ports.
    pub fn new(photos: Arc<dyn PhotoRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { photos, profiles }
    }

    async fn author_index(&self, owners: &[UserId]) -> HashMap<UserId, Profile> {
        match self.profiles.find_many(owners).await {
            Ok(profiles) => profiles
                .into_iter()
                .map(|profile| (profile.user_id().clone(), profile))
                .collect(),
            Err(err) => {
                // A missing author never hides a photo; fall back to
                // placeholder attribution for the whole page.
                warn!(error = %err, "profile batch lookup failed; using placeholders");
                HashMap::new()
            }
        }
    }
}

#[async_trait]
impl FeedQuery for FeedService {
    async fn feed(&self) -> Result<Vec<FeedPhoto>, Error> {
        let mut photos = self.photos.list_all().await?;
        photos.sort_by_key(|photo| Reverse((photo.created_at(), photo.id().to_string())));

        let owners: Vec<UserId> = photos
            .iter()
            .map(|photo| photo.owner().clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let authors = self.author_index(&owners).await;

        Ok(photos
            .into_iter()
            .map(|photo| {
                let author = authors
                    .get(photo.owner())
                    .map(FeedAuthor::from_profile)
                    .unwrap_or_else(FeedAuthor::placeholder);
                FeedPhoto::new(photo, author)
            })
            .collect())
    }
}
