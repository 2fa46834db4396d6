//! Driving port for reading the shared photo feed.

use async_trait::async_trait;

use crate::domain::{Error, FeedPhoto};

/// Domain use-case port for the feed.
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Return every photo, newest first, joined with author attribution.
    ///
    /// Ordering is strict: `created_at` descending with photo id as the
    /// tie-breaker, so repeated reads of unchanged data are identical.
    async fn feed(&self) -> Result<Vec<FeedPhoto>, Error>;
}
