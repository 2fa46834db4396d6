//! Upload service: per-user drafts and the all-or-nothing batch submit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use super::draft::{DraftError, StagedFile, StagedFileId, UploadDraft};
use super::photo::{Caption, Photo, PhotoId};
use super::ports::{
    DraftView, FeedEvent, FeedEvents, ObjectStorage, PhotoRepository, SubmitOutcome, Uploads,
};
use super::{Error, UserId};

impl From<DraftError> for Error {
    fn from(value: DraftError) -> Self {
        match value {
            DraftError::UnsupportedImage { .. } => Error::invalid_request(value.to_string()),
            DraftError::UnknownFile { .. } => Error::not_found(value.to_string()),
            DraftError::SubmitInFlight => Error::conflict(value.to_string()),
            DraftError::NothingStaged => Error::invalid_request(value.to_string()),
        }
    }
}

/// Holds every user's draft and runs the submit workflow.
///
/// Drafts are process-local: they live in a mutex-guarded map and are lost
/// on restart, which is acceptable because nothing in a draft has been
/// published yet. The mutex is never held across an await point.
pub struct UploadService {
    drafts: Mutex<HashMap<UserId, UploadDraft>>,
    storage: Arc<dyn ObjectStorage>,
    photos: Arc<dyn PhotoRepository>,
    events: Arc<dyn FeedEvents>,
}

impl UploadService {
    /// Wire the service to its driven ports.
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        photos: Arc<dyn PhotoRepository>,
        events: Arc<dyn FeedEvents>,
    ) -> Self {
        Self {
            drafts: Mutex::new(HashMap::new()),
            storage,
            photos,
            events,
        }
    }

    fn lock_drafts(&self) -> Result<MutexGuard<'_, HashMap<UserId, UploadDraft>>, Error> {
        self.drafts
            .lock()
            .map_err(|_| Error::internal("draft state is poisoned"))
    }

    fn with_draft<T>(
        &self,
        user: &UserId,
        op: impl FnOnce(&mut UploadDraft) -> Result<T, DraftError>,
    ) -> Result<T, Error> {
        let mut drafts = self.lock_drafts()?;
        let draft = drafts.entry(user.clone()).or_default();
        Ok(op(draft)?)
    }

    /// Undo the persisted half of a failed batch, newest work first.
    async fn roll_back(&self, user: &UserId, created: &[(String, Photo)]) {
        for (key, photo) in created.iter().rev() {
            if let Err(err) = self.photos.delete(photo.id()).await {
                warn!(user = %user, photo = %photo.id(), error = %err,
                    "rollback failed to delete photo record");
            }
            if let Err(err) = self.storage.delete(key).await {
                warn!(user = %user, key = %key, error = %err,
                    "rollback failed to delete stored object");
            }
        }
    }

    async fn persist_batch(
        &self,
        user: &UserId,
        files: &[StagedFile],
        caption: Option<&Caption>,
    ) -> Result<Vec<(String, Photo)>, Error> {
        let mut created: Vec<(String, Photo)> = Vec::with_capacity(files.len());
        for file in files {
            let key = format!(
                "{}/{}-{}",
                user,
                Utc::now().timestamp_millis(),
                file.filename()
            );

            let image_url = match self.storage.put(&key, file.bytes()).await {
                Ok(url) => url,
                Err(err) => {
                    warn!(user = %user, filename = %file.filename(), error = %err,
                        "batch upload failed; rolling back");
                    self.roll_back(user, &created).await;
                    return Err(err);
                }
            };

            let photo = Photo::new(
                PhotoId::random(),
                user.clone(),
                image_url,
                caption.cloned(),
                Utc::now(),
            );
            if let Err(err) = self.photos.insert(&photo).await {
                warn!(user = %user, filename = %file.filename(), error = %err,
                    "batch upload failed; rolling back");
                // The object already sits under `key`; record the pair so the
                // rollback deletes it. Deleting the never-inserted photo row
                // is a no-op.
                created.push((key, photo));
                self.roll_back(user, &created).await;
                return Err(err);
            }
            created.push((key, photo));
        }
        Ok(created)
    }
}

#[async_trait]
impl Uploads for UploadService {
    async fn stage(
        &self,
        user: &UserId,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<DraftView, Error> {
        self.with_draft(user, |draft| {
            draft.stage(filename, content_type, bytes)?;
            Ok(DraftView::from(&*draft))
        })
    }

    async fn remove(&self, user: &UserId, file: &StagedFileId) -> Result<DraftView, Error> {
        self.with_draft(user, |draft| {
            draft.remove(file)?;
            Ok(DraftView::from(&*draft))
        })
    }

    async fn set_caption(&self, user: &UserId, caption: String) -> Result<DraftView, Error> {
        self.with_draft(user, |draft| {
            draft.set_caption(caption)?;
            Ok(DraftView::from(&*draft))
        })
    }

    async fn draft(&self, user: &UserId) -> Result<DraftView, Error> {
        self.with_draft(user, |draft| Ok(DraftView::from(&*draft)))
    }

    async fn submit(&self, user: &UserId) -> Result<SubmitOutcome, Error> {
        let (files, raw_caption) = self.with_draft(user, UploadDraft::begin_submit)?;
        let caption = Caption::from_raw(&raw_caption);

        let created = match self.persist_batch(user, &files, caption.as_ref()).await {
            Ok(created) => created,
            Err(err) => {
                self.with_draft(user, |draft| {
                    draft.abort_submit();
                    Ok(())
                })?;
                return Err(err);
            }
        };

        self.with_draft(user, |draft| {
            draft.complete_submit();
            Ok(())
        })?;

        let photos: Vec<Photo> = created.into_iter().map(|(_, photo)| photo).collect();
        for photo in &photos {
            self.events.publish(FeedEvent::PhotoAdded {
                photo_id: photo.id().clone(),
                owner: user.clone(),
            });
        }
        info!(user = %user, count = photos.len(), "upload batch published");
        Ok(SubmitOutcome::new(photos))
    }
}
