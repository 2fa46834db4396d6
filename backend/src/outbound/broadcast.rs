//! Process-local feed event fan-out.

use tokio::sync::broadcast;

use crate::domain::ports::{FeedEvent, FeedEvents};

/// Fan-out built on a tokio broadcast channel.
///
/// Slow subscribers lag rather than block the publisher; a lagged receiver
/// simply re-queries the feed, which is the protocol anyway.
pub struct FeedBroadcaster {
    sender: broadcast::Sender<FeedEvent>,
}

impl FeedBroadcaster {
    /// Create a broadcaster buffering up to `capacity` undelivered notices
    /// per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl FeedEvents for FeedBroadcaster {
    fn publish(&self, event: FeedEvent) {
        // Send only fails when no subscriber exists, which is fine.
        let _ = self.sender.send(event);
    }

    fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }
}
