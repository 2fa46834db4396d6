//! Domain layer: validated value types, use-case services, and the ports
//! that connect them to the adapters.
//!
//! Nothing in this module imports actix, the filesystem, or any other
//! infrastructure concern; adapters depend on the domain, never the other
//! way round.

pub mod accounts;
pub mod auth;
pub mod draft;
pub mod error;
pub mod feed;
pub mod photo;
pub mod ports;
pub mod uploads;
pub mod user;

pub use accounts::AccountService;
pub use auth::{AuthValidationError, EmailAddress, SignInCredentials, SignUpRequest};
pub use draft::{DraftError, StagedFileId, UploadDraft};
pub use error::{Error, ErrorCode, ErrorValidationError};
pub use feed::FeedService;
pub use photo::{Caption, FeedAuthor, FeedPhoto, Photo, PhotoId, PhotoValidationError};
pub use uploads::UploadService;
pub use user::{
    AvatarColor, DISPLAY_NAME_MAX, DisplayName, Identity, PLACEHOLDER_AVATAR_COLOR, Profile,
    UserId, UserValidationError,
};
