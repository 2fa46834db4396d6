//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use super::state::HttpState;
use crate::domain::{AccountService, FeedService, UploadService};
use crate::outbound::{
    FeedBroadcaster, MemoryIdentityProvider, MemoryObjectStorage, MemoryPhotoRepository,
    MemoryProfileRepository,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build an [`HttpState`] wired entirely to in-memory adapters.
pub fn memory_http_state() -> HttpState {
    let identities = Arc::new(MemoryIdentityProvider::new());
    let profiles = Arc::new(MemoryProfileRepository::new());
    let photos = Arc::new(MemoryPhotoRepository::new());
    let storage = Arc::new(MemoryObjectStorage::new());
    let events = Arc::new(FeedBroadcaster::new(16));

    HttpState::new(
        Arc::new(AccountService::new(identities, Arc::clone(&profiles) as _)),
        Arc::new(FeedService::new(Arc::clone(&photos) as _, profiles)),
        Arc::new(UploadService::new(storage, photos, events)),
    )
}
