//! Driving port for the upload workflow.
//!
//! Every operation is scoped to the authenticated user: each user has at
//! most one draft, and a draft is never visible to anyone else.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::draft::{StagedFile, StagedFileId, UploadDraft};
use crate::domain::{Error, Photo, UserId};

/// Read model of one staged file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StagedFileView {
    /// Local identifier used to remove the file again.
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// Size in bytes.
    pub size: usize,
}

impl From<&StagedFile> for StagedFileView {
    fn from(file: &StagedFile) -> Self {
        Self {
            id: file.id().to_string(),
            filename: file.filename().to_owned(),
            size: file.size(),
        }
    }
}

/// Read model of a user's current draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    /// Staged files in staging order.
    pub files: Vec<StagedFileView>,
    /// Shared caption as typed.
    pub caption: String,
    /// True while a submit is in flight.
    pub submitting: bool,
}

impl From<&UploadDraft> for DraftView {
    fn from(draft: &UploadDraft) -> Self {
        Self {
            files: draft.files().iter().map(StagedFileView::from).collect(),
            caption: draft.caption().to_owned(),
            submitting: draft.is_submitting(),
        }
    }
}

/// Result of a fully successful batch submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    created: Vec<Photo>,
}

impl SubmitOutcome {
    /// Wrap the photos created by the batch, in staging order.
    pub fn new(created: Vec<Photo>) -> Self {
        Self { created }
    }

    /// The photos created by the batch.
    pub fn created(&self) -> &[Photo] {
        &self.created
    }
}

/// Domain use-case port for staging and submitting uploads.
#[async_trait]
pub trait Uploads: Send + Sync {
    /// Stage a file into the user's draft and return the updated view.
    async fn stage(
        &self,
        user: &UserId,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<DraftView, Error>;

    /// Remove one staged file by its local id.
    async fn remove(&self, user: &UserId, file: &StagedFileId) -> Result<DraftView, Error>;

    /// Replace the caption shared by the batch.
    async fn set_caption(&self, user: &UserId, caption: String) -> Result<DraftView, Error>;

    /// Return the user's current draft (empty if none exists yet).
    async fn draft(&self, user: &UserId) -> Result<DraftView, Error>;

    /// Submit the whole draft as one all-or-nothing batch.
    ///
    /// On success the draft is cleared; on any failure the draft is left
    /// intact (every file still staged) and any partial work is rolled back
    /// before the error is returned.
    async fn submit(&self, user: &UserId) -> Result<SubmitOutcome, Error>;
}
