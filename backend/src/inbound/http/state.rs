//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{Accounts, FeedQuery, Uploads};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn Accounts>,
    pub feed: Arc<dyn FeedQuery>,
    pub uploads: Arc<dyn Uploads>,
}

impl HttpState {
    /// Bundle the driving ports for injection into the app.
    pub fn new(
        accounts: Arc<dyn Accounts>,
        feed: Arc<dyn FeedQuery>,
        uploads: Arc<dyn Uploads>,
    ) -> Self {
        Self {
            accounts,
            feed,
            uploads,
        }
    }
}
