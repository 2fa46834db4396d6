//! Transient upload draft: the staging area for files not yet submitted.
//!
//! One draft exists per signed-in user and lives only in process memory.
//! The draft is a small state machine: it starts empty, accumulates staged
//! image files, and locks itself against mutation while a submit is in
//! flight so the workflow can never be re-entered concurrently.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use thiserror::Error;

/// File extensions and MIME subtypes accepted by the staging allow-list.
const IMAGE_ALLOW_LIST: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

/// Errors raised by draft mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// The file is not an accepted image type.
    #[error("{filename} is not a supported image type")]
    UnsupportedImage { filename: String },
    /// No staged file carries the given id.
    #[error("no staged file with id {id}")]
    UnknownFile { id: String },
    /// A submit is in flight; mutations are locked out.
    #[error("an upload is already in progress")]
    SubmitInFlight,
    /// Submit was requested with nothing staged.
    #[error("no files are staged for upload")]
    NothingStaged,
}

/// Random local identifier for removal-by-id of a staged file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StagedFileId(String);

impl StagedFileId {
    /// Generate a short random identifier.
    pub fn random() -> Self {
        let raw: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(7)
            .map(char::from)
            .collect();
        Self(raw.to_lowercase())
    }

    /// Wrap a caller-provided identifier (e.g. from a URL path segment).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl AsRef<str> for StagedFileId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StagedFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A file staged for upload: raw bytes plus the original filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    id: StagedFileId,
    filename: String,
    bytes: Vec<u8>,
}

impl StagedFile {
    /// Local identifier used for removal.
    pub fn id(&self) -> &StagedFileId {
        &self.id
    }

    /// Original filename, used in the storage key.
    pub fn filename(&self) -> &str {
        self.filename.as_str()
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Staged size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Returns true when the filename extension or MIME type is on the image
/// allow-list.
pub fn is_supported_image(filename: &str, content_type: Option<&str>) -> bool {
    let by_extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_ALLOW_LIST.contains(&ext.as_str())
        })
        .unwrap_or(false);

    let by_mime = content_type
        .and_then(|mime| mime.split(';').next())
        .and_then(|mime| mime.trim().strip_prefix("image/"))
        .map(|subtype| {
            let subtype = subtype.to_ascii_lowercase();
            IMAGE_ALLOW_LIST.contains(&subtype.as_str())
        })
        .unwrap_or(false);

    by_extension || by_mime
}

/// Per-user staging area with one shared caption.
///
/// ## Invariants
/// - Staged file order is stable: submission processes files in staging
///   order, and removal preserves the relative order of the rest.
/// - While `submitting` is set, every mutating operation fails with
///   [`DraftError::SubmitInFlight`].
#[derive(Debug, Default)]
pub struct UploadDraft {
    files: Vec<StagedFile>,
    caption: String,
    submitting: bool,
}

impl UploadDraft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a file after validating it against the image allow-list.
    ///
    /// Returns the generated local id of the staged file.
    pub fn stage(
        &mut self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<StagedFileId, DraftError> {
        self.ensure_not_submitting()?;
        if !is_supported_image(filename, content_type) {
            return Err(DraftError::UnsupportedImage {
                filename: filename.to_owned(),
            });
        }

        let id = StagedFileId::random();
        self.files.push(StagedFile {
            id: id.clone(),
            filename: filename.to_owned(),
            bytes,
        });
        Ok(id)
    }

    /// Remove one staged file by its local id.
    pub fn remove(&mut self, id: &StagedFileId) -> Result<(), DraftError> {
        self.ensure_not_submitting()?;
        let before = self.files.len();
        self.files.retain(|file| file.id() != id);
        if self.files.len() == before {
            return Err(DraftError::UnknownFile {
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Replace the caption shared by the whole batch.
    pub fn set_caption(&mut self, caption: String) -> Result<(), DraftError> {
        self.ensure_not_submitting()?;
        self.caption = caption;
        Ok(())
    }

    /// Staged files in staging order.
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// The shared caption as typed (untrimmed).
    pub fn caption(&self) -> &str {
        self.caption.as_str()
    }

    /// True while a submit is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Enter the submitting state and return a snapshot of the batch.
    ///
    /// The staged files stay in the draft so a failed batch can be retried
    /// unchanged; [`Self::complete_submit`] clears them on full success and
    /// [`Self::abort_submit`] merely unlocks mutation again.
    pub fn begin_submit(&mut self) -> Result<(Vec<StagedFile>, String), DraftError> {
        self.ensure_not_submitting()?;
        if self.files.is_empty() {
            return Err(DraftError::NothingStaged);
        }
        self.submitting = true;
        Ok((self.files.clone(), self.caption.clone()))
    }

    /// Clear the draft after a fully successful batch.
    pub fn complete_submit(&mut self) {
        self.files.clear();
        self.caption.clear();
        self.submitting = false;
    }

    /// Unlock the draft after a failed batch, leaving all files staged.
    pub fn abort_submit(&mut self) {
        self.submitting = false;
    }

    fn ensure_not_submitting(&self) -> Result<(), DraftError> {
        if self.submitting {
            return Err(DraftError::SubmitInFlight);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn bytes() -> Vec<u8> {
        vec![0xff, 0xd8, 0xff]
    }

    #[rstest]
    #[case("sunset.jpg", None, true)]
    #[case("sunset.JPEG", None, true)]
    #[case("deck.png", None, true)]
    #[case("wave.gif", None, true)]
    #[case("cabin.webp", None, true)]
    #[case("notes.txt", None, false)]
    #[case("archive.tar.gz", None, false)]
    #[case("noextension", None, false)]
    #[case("noextension", Some("image/png"), true)]
    #[case("noextension", Some("image/png; charset=binary"), true)]
    #[case("noextension", Some("image/tiff"), false)]
    #[case("noextension", Some("text/plain"), false)]
    fn allow_list_cases(
        #[case] filename: &str,
        #[case] content_type: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(is_supported_image(filename, content_type), expected);
    }

    #[rstest]
    fn stage_rejects_unsupported_files() {
        let mut draft = UploadDraft::new();
        let err = draft
            .stage("itinerary.pdf", None, bytes())
            .expect_err("pdf must be rejected");
        assert!(matches!(err, DraftError::UnsupportedImage { .. }));
        assert!(draft.is_empty());
    }

    #[rstest]
    fn remove_by_id_preserves_relative_order() {
        let mut draft = UploadDraft::new();
        let first = draft.stage("a.jpg", None, bytes()).expect("staged");
        let _second = draft.stage("b.jpg", None, bytes()).expect("staged");
        let _third = draft.stage("c.jpg", None, bytes()).expect("staged");

        draft.remove(&first).expect("removed");

        let names: Vec<&str> = draft.files().iter().map(StagedFile::filename).collect();
        assert_eq!(names, vec!["b.jpg", "c.jpg"]);
    }

    #[rstest]
    fn remove_unknown_id_fails() {
        let mut draft = UploadDraft::new();
        draft.stage("a.jpg", None, bytes()).expect("staged");
        let err = draft
            .remove(&StagedFileId::from_raw("missing"))
            .expect_err("unknown id must fail");
        assert!(matches!(err, DraftError::UnknownFile { .. }));
        assert_eq!(draft.files().len(), 1);
    }

    #[rstest]
    fn removing_last_file_returns_draft_to_empty() {
        let mut draft = UploadDraft::new();
        let id = draft.stage("a.jpg", None, bytes()).expect("staged");
        draft.remove(&id).expect("removed");
        assert!(draft.is_empty());
    }

    #[rstest]
    fn submit_locks_out_mutation_until_resolution() {
        let mut draft = UploadDraft::new();
        draft.stage("a.jpg", None, bytes()).expect("staged");
        let (snapshot, _caption) = draft.begin_submit().expect("submit begins");
        assert_eq!(snapshot.len(), 1);

        assert_eq!(
            draft.stage("b.jpg", None, bytes()),
            Err(DraftError::SubmitInFlight)
        );
        assert_eq!(
            draft.set_caption("late".into()),
            Err(DraftError::SubmitInFlight)
        );
        assert_eq!(draft.begin_submit().map(|_| ()), Err(DraftError::SubmitInFlight));

        draft.abort_submit();
        assert_eq!(draft.files().len(), 1, "failed batch keeps all files");
        draft.stage("b.jpg", None, bytes()).expect("unlocked again");
    }

    #[rstest]
    fn complete_submit_clears_files_and_caption() {
        let mut draft = UploadDraft::new();
        draft.stage("a.jpg", None, bytes()).expect("staged");
        draft.set_caption("Sunset!".into()).expect("caption set");
        draft.begin_submit().expect("submit begins");

        draft.complete_submit();
        assert!(draft.is_empty());
        assert_eq!(draft.caption(), "");
        assert!(!draft.is_submitting());
    }

    #[rstest]
    fn empty_draft_cannot_submit() {
        let mut draft = UploadDraft::new();
        assert_eq!(
            draft.begin_submit().map(|_| ()),
            Err(DraftError::NothingStaged)
        );
    }
}
