//! Wire-level notice payloads for the WebSocket adapter.

use serde::Serialize;

use crate::domain::ports::FeedEvent;

/// Outbound notice sent to connected clients.
///
/// Every variant means the same thing to a client: the feed changed,
/// re-query it. The payload identifies what changed for logging and
/// debugging, never for incremental rendering.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedNotice {
    /// A photo joined the feed.
    #[serde(rename_all = "camelCase")]
    PhotoAdded { photo_id: String, owner: String },
    /// The notice stream lagged; the client may have missed changes.
    Resync,
}

impl From<FeedEvent> for FeedNotice {
    fn from(event: FeedEvent) -> Self {
        match event {
            FeedEvent::PhotoAdded { photo_id, owner } => Self::PhotoAdded {
                photo_id: photo_id.to_string(),
                owner: owner.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{PhotoId, UserId};
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    fn photo_added_serialises_with_camel_case_fields() {
        let photo_id = PhotoId::random();
        let owner = UserId::random();
        let notice = FeedNotice::from(FeedEvent::PhotoAdded {
            photo_id: photo_id.clone(),
            owner: owner.clone(),
        });

        let value = serde_json::to_value(&notice).expect("notice serialises");
        assert_eq!(value.get("type").and_then(Value::as_str), Some("photoAdded"));
        assert_eq!(
            value.get("photoId").and_then(Value::as_str),
            Some(photo_id.as_ref())
        );
        assert_eq!(
            value.get("owner").and_then(Value::as_str),
            Some(owner.as_ref())
        );
    }

    #[rstest]
    fn resync_serialises_as_a_bare_type() {
        let value = serde_json::to_value(FeedNotice::Resync).expect("notice serialises");
        assert_eq!(value.get("type").and_then(Value::as_str), Some("resync"));
    }
}
