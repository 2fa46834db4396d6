//! Outbound adapters implementing the driven ports.
//!
//! The in-memory adapters are first-class: they back the development server
//! and every test. The directory-backed object store is the only adapter
//! that touches the host filesystem, and it does so through a capability
//! handle rather than ambient paths.

mod auth;
mod broadcast;
mod persistence;
mod storage;

pub use auth::MemoryIdentityProvider;
pub use broadcast::FeedBroadcaster;
pub use persistence::{MemoryPhotoRepository, MemoryProfileRepository};
pub use storage::{DirObjectStorage, MemoryObjectStorage};
