//! Driven port for publishing feed change notices.
//!
//! Notices are deliberately thin: they carry identifiers only, and
//! subscribers re-query the feed through [`super::FeedQuery`] on receipt.
//! That keeps every reader converging on the same authoritative ordering
//! even when notices are dropped or arrive out of order.

use tokio::sync::broadcast;

use crate::domain::{PhotoId, UserId};

/// A change to the shared feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A photo was persisted and is now part of the feed.
    PhotoAdded {
        /// The new photo's identifier.
        photo_id: PhotoId,
        /// The authoring user.
        owner: UserId,
    },
}

/// Fan-out of feed change notices to connected subscribers.
pub trait FeedEvents: Send + Sync {
    /// Publish a notice to all current subscribers. Publishing with no
    /// subscribers is a no-op.
    fn publish(&self, event: FeedEvent);

    /// Open a new subscription receiving notices published after this call.
    fn subscribe(&self) -> broadcast::Receiver<FeedEvent>;
}
