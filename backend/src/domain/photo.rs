//! Photo aggregate and the joined feed view.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::user::{AvatarColor, DisplayName, Profile, UserId};

/// Validation errors returned by photo value type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoValidationError {
    EmptyId,
    InvalidId,
}

impl fmt::Display for PhotoValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "photo id must not be empty"),
            Self::InvalidId => write!(f, "photo id must be a valid UUID"),
        }
    }
}

impl std::error::Error for PhotoValidationError {}

/// Stable photo identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoId(Uuid, String);

impl PhotoId {
    /// Validate and construct a [`PhotoId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PhotoValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`PhotoId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, PhotoValidationError> {
        if id.is_empty() {
            return Err(PhotoValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| PhotoValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }
}

impl AsRef<str> for PhotoId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PhotoId> for String {
    fn from(value: PhotoId) -> Self {
        let PhotoId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for PhotoId {
    type Error = PhotoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Optional photo caption.
///
/// ## Invariants
/// - Trimmed; a blank or whitespace-only caption is represented as absence,
///   never as an empty [`Caption`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    /// Build a caption from raw input, returning `None` when the trimmed
    /// text is empty.
    ///
    /// # Examples
    /// ```
    /// use voyage_backend::domain::Caption;
    ///
    /// assert!(Caption::from_raw("   ").is_none());
    /// assert_eq!(Caption::from_raw(" Sunset! ").map(String::from), Some("Sunset!".into()));
    /// ```
    pub fn from_raw(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }
}

impl AsRef<str> for Caption {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Caption> for String {
    fn from(value: Caption) -> Self {
        value.0
    }
}

/// A persisted photo record.
///
/// ## Invariants
/// - Authored by exactly one user; never edited or deleted through the
///   public API (deletion exists only as batch compensation).
/// - `image_url` is a permanent public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    id: PhotoId,
    owner: UserId,
    image_url: Url,
    caption: Option<Caption>,
    created_at: DateTime<Utc>,
}

impl Photo {
    /// Build a photo from validated components.
    pub fn new(
        id: PhotoId,
        owner: UserId,
        image_url: Url,
        caption: Option<Caption>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            image_url,
            caption,
            created_at,
        }
    }

    /// Stable photo identifier.
    pub fn id(&self) -> &PhotoId {
        &self.id
    }

    /// Identifier of the authoring user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Public URL of the stored image.
    pub fn image_url(&self) -> &Url {
        &self.image_url
    }

    /// Optional caption shared by the upload batch.
    pub fn caption(&self) -> Option<&Caption> {
        self.caption.as_ref()
    }

    /// Creation timestamp used for feed ordering.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Display attribution for a feed entry.
///
/// Falls back to a placeholder when the author profile cannot be resolved,
/// so every photo in the feed always renders with *some* author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedAuthor {
    display_name: Option<DisplayName>,
    avatar_color: AvatarColor,
}

impl FeedAuthor {
    /// Attribution taken from a resolved profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            display_name: Some(profile.display_name().clone()),
            avatar_color: profile.avatar_color().clone(),
        }
    }

    /// Placeholder attribution for an unresolvable author.
    pub fn placeholder() -> Self {
        Self {
            display_name: None,
            avatar_color: AvatarColor::placeholder(),
        }
    }

    /// Resolved display name, if any.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Avatar colour (placeholder blue when unresolved).
    pub fn avatar_color(&self) -> &AvatarColor {
        &self.avatar_color
    }

    /// Uppercase initial for the avatar badge, `?` when unresolved.
    pub fn initial(&self) -> char {
        self.display_name
            .as_ref()
            .map(DisplayName::initial)
            .unwrap_or('?')
    }
}

/// A photo joined with its author's display attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPhoto {
    photo: Photo,
    author: FeedAuthor,
}

impl FeedPhoto {
    /// Pair a photo with its (possibly placeholder) author.
    pub fn new(photo: Photo, author: FeedAuthor) -> Self {
        Self { photo, author }
    }

    /// The underlying photo record.
    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    /// The author attribution.
    pub fn author(&self) -> &FeedAuthor {
        &self.author
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case("Sunset!", Some("Sunset!"))]
    #[case("  Sunset!  ", Some("Sunset!"))]
    fn caption_trims_and_drops_blank(#[case] raw: &str, #[case] expected: Option<&str>) {
        let caption = Caption::from_raw(raw);
        assert_eq!(caption.as_ref().map(|c| c.as_ref()), expected);
    }

    #[rstest]
    fn placeholder_author_uses_fallback_colour_and_initial() {
        let author = FeedAuthor::placeholder();
        assert_eq!(author.avatar_color().as_ref(), "#4299e1");
        assert_eq!(author.initial(), '?');
        assert!(author.display_name().is_none());
    }

    #[rstest]
    fn profile_author_exposes_initial() {
        let profile = Profile::new(
            UserId::random(),
            DisplayName::new("alice").expect("valid name"),
            AvatarColor::new("#48bb78").expect("valid colour"),
        );
        let author = FeedAuthor::from_profile(&profile);
        assert_eq!(author.initial(), 'A');
        assert_eq!(
            author.display_name().map(AsRef::as_ref),
            Some("alice")
        );
    }

    #[rstest]
    fn photo_id_round_trips_through_serde() {
        let id = PhotoId::random();
        let json = serde_json::to_string(&id).expect("serialises");
        let back: PhotoId = serde_json::from_str(&json).expect("deserialises");
        assert_eq!(back, id);
    }
}
