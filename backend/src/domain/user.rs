//! User identity and profile value types.
//!
//! An [`Identity`] is the record issued by the authentication port; a
//! [`Profile`] carries the display metadata (name, avatar colour) created
//! once at sign-up and immutable afterwards.

use std::fmt;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::EmailAddress;

/// Validation errors returned by the user value type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    InvalidAvatarColor,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::InvalidAvatarColor => {
                write!(f, "avatar colour must be a #rrggbb hex string")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human readable display name shown next to photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from raw input.
    ///
    /// The name is trimmed; it must be non-empty afterwards.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, UserValidationError> {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// First character of the name, uppercased, for avatar badges.
    pub fn initial(&self) -> char {
        self.0
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Default avatar palette assigned round-robin-free at sign-up.
const AVATAR_PALETTE: [&str; 8] = [
    "#f56565", "#ed8936", "#ecc94b", "#48bb78", "#38b2ac", "#4299e1", "#9f7aea", "#ed64a6",
];

/// Colour used when a photo's author profile cannot be resolved.
pub const PLACEHOLDER_AVATAR_COLOR: &str = "#4299e1";

/// Avatar colour as a `#rrggbb` hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AvatarColor(String);

impl AvatarColor {
    /// Validate and construct an [`AvatarColor`] from raw input.
    pub fn new(color: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(color.into())
    }

    /// Pick a colour from the default palette.
    pub fn from_palette() -> Self {
        let mut rng = rand::thread_rng();
        let chosen = AVATAR_PALETTE
            .choose(&mut rng)
            .copied()
            .unwrap_or(PLACEHOLDER_AVATAR_COLOR);
        Self(chosen.to_owned())
    }

    /// Colour substituted when no profile resolves for an author.
    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_AVATAR_COLOR.to_owned())
    }

    fn from_owned(color: String) -> Result<Self, UserValidationError> {
        let bytes = color.as_bytes();
        let valid = bytes.len() == 7
            && bytes[0] == b'#'
            && bytes[1..].iter().all(u8::is_ascii_hexdigit);
        if !valid {
            return Err(UserValidationError::InvalidAvatarColor);
        }
        Ok(Self(color.to_ascii_lowercase()))
    }
}

impl AsRef<str> for AvatarColor {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AvatarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AvatarColor> for String {
    fn from(value: AvatarColor) -> Self {
        value.0
    }
}

impl TryFrom<String> for AvatarColor {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Authenticated identity issued by the authentication port.
///
/// The application holds a read-only cached copy; the token is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: UserId,
    email: EmailAddress,
    token: String,
}

impl Identity {
    /// Build an identity from validated components.
    pub fn new(id: UserId, email: EmailAddress, token: impl Into<String>) -> Self {
        Self {
            id,
            email,
            token: token.into(),
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Email address the identity was registered with.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Opaque session token issued by the authentication port.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }
}

/// Display metadata associated 1:1 with an [`Identity`].
///
/// ## Invariants
/// - Created once at sign-up; never mutated by this application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    user_id: UserId,
    display_name: DisplayName,
    avatar_color: AvatarColor,
}

impl Profile {
    /// Build a profile from validated components.
    pub fn new(user_id: UserId, display_name: DisplayName, avatar_color: AvatarColor) -> Self {
        Self {
            user_id,
            display_name,
            avatar_color,
        }
    }

    /// Identifier of the owning identity.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Display name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Avatar colour assigned at sign-up.
    pub fn avatar_color(&self) -> &AvatarColor {
        &self.avatar_color
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = UserId::new(raw).expect_err("invalid ids must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn user_id_round_trips_through_serde() {
        let id = UserId::random();
        let json = serde_json::to_string(&id).expect("serialises");
        let back: UserId = serde_json::from_str(&json).expect("deserialises");
        assert_eq!(back, id);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn display_name_rejects_blank(#[case] raw: &str) {
        let err = DisplayName::new(raw).expect_err("blank names must fail");
        assert_eq!(err, UserValidationError::EmptyDisplayName);
    }

    #[rstest]
    fn display_name_is_trimmed_and_keeps_interior_spaces() {
        let name = DisplayName::new("  Ada Lovelace  ").expect("valid name");
        assert_eq!(name.as_ref(), "Ada Lovelace");
        assert_eq!(name.initial(), 'A');
    }

    #[rstest]
    #[case("Ada Lovelace", 'A')]
    #[case("éloise", 'É')]
    #[case("ștefan", 'Ș')]
    fn display_name_initial_uppercases_beyond_ascii(#[case] raw: &str, #[case] expected: char) {
        let name = DisplayName::new(raw).expect("valid name");
        assert_eq!(name.initial(), expected);
    }

    #[rstest]
    fn display_name_rejects_over_length() {
        let raw = "a".repeat(DISPLAY_NAME_MAX + 1);
        let err = DisplayName::new(raw).expect_err("over-long names must fail");
        assert_eq!(
            err,
            UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            }
        );
    }

    #[rstest]
    #[case("#4299e1", true)]
    #[case("#4299E1", true)]
    #[case("4299e1", false)]
    #[case("#4299e", false)]
    #[case("#4299eg", false)]
    fn avatar_color_validates_hex_form(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(AvatarColor::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn palette_colours_are_valid() {
        for _ in 0..16 {
            let color = AvatarColor::from_palette();
            assert!(AvatarColor::new(color.as_ref()).is_ok());
        }
    }
}
