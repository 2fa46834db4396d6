//! Shared WebSocket adapter state.

use std::sync::Arc;

use crate::domain::ports::FeedEvents;

/// Dependency bundle for the WebSocket endpoint.
#[derive(Clone)]
pub struct WsState {
    pub events: Arc<dyn FeedEvents>,
}

impl WsState {
    /// Bundle the event fan-out for injection into the app.
    pub fn new(events: Arc<dyn FeedEvents>) -> Self {
        Self { events }
    }
}
