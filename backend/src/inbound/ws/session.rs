//! Per-connection WebSocket loop.
//!
//! Keeps framing and heartbeats at the edge: the loop pings every 5s,
//! considers the connection idle after 10s without client traffic, and
//! forwards feed notices from the broadcast channel. Tests shorten the
//! intervals to speed up feedback.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time;
use tracing::warn;

use super::messages::FeedNotice;
use crate::domain::ports::FeedEvent;

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

enum SessionEnd {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    BroadcastClosed,
    Network(Closed),
}

/// Drive one connection until it ends.
pub(super) async fn run(
    mut session: Session,
    mut stream: MessageStream,
    mut notices: broadcast::Receiver<FeedEvent>,
) {
    let mut last_heartbeat = Instant::now();
    let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

    let end = loop {
        let result = tokio::select! {
            _ = heartbeat.tick() => {
                heartbeat_tick(&mut session, last_heartbeat).await
            }
            message = stream.recv() => {
                stream_message(&mut session, &mut last_heartbeat, message).await
            }
            notice = notices.recv() => {
                forward_notice(&mut session, notice).await
            }
        };

        if let Err(end) = result {
            break end;
        }
    };

    log_end(&end);
    close_if_needed(session, close_reason_for(&end)).await;
}

async fn heartbeat_tick(session: &mut Session, last_heartbeat: Instant) -> Result<(), SessionEnd> {
    if Instant::now().duration_since(last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionEnd::HeartbeatTimeout);
    }
    session.ping(b"").await.map_err(SessionEnd::Network)
}

async fn stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionEnd> {
    let Some(message) = message else {
        return Err(SessionEnd::StreamClosed);
    };

    match message {
        Ok(Message::Ping(payload)) => {
            *last_heartbeat = Instant::now();
            session.pong(&payload).await.map_err(SessionEnd::Network)
        }
        Ok(Message::Close(reason)) => Err(SessionEnd::ClientClosed(reason)),
        Ok(_) => {
            // The protocol is push-only; any client frame just proves
            // liveness.
            *last_heartbeat = Instant::now();
            Ok(())
        }
        Err(error) => Err(SessionEnd::Protocol(error)),
    }
}

async fn forward_notice(
    session: &mut Session,
    notice: Result<FeedEvent, RecvError>,
) -> Result<(), SessionEnd> {
    let payload = match notice {
        Ok(event) => FeedNotice::from(event),
        // Dropped notices still mean "the feed changed"; tell the client
        // to re-query rather than silently miss photos.
        Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "WebSocket subscriber lagged; forcing resync");
            FeedNotice::Resync
        }
        Err(RecvError::Closed) => return Err(SessionEnd::BroadcastClosed),
    };
    send_json(session, &payload).await.map_err(SessionEnd::Network)
}

async fn send_json<T: serde::Serialize>(session: &mut Session, payload: &T) -> Result<(), Closed> {
    match serde_json::to_string(payload) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            warn!(error = %error, "failed to serialise WebSocket payload");
            Ok(())
        }
    }
}

fn log_end(end: &SessionEnd) {
    match end {
        SessionEnd::HeartbeatTimeout => {
            warn!("WebSocket heartbeat timeout; closing connection");
        }
        SessionEnd::Protocol(error) => {
            warn!(error = %error, "WebSocket protocol error");
        }
        SessionEnd::Network(error) => {
            warn!(error = %error, "WebSocket send failed; closing connection");
        }
        SessionEnd::ClientClosed(_) | SessionEnd::StreamClosed | SessionEnd::BroadcastClosed => {}
    }
}

fn close_reason_for(end: &SessionEnd) -> Option<Option<CloseReason>> {
    match end {
        SessionEnd::HeartbeatTimeout => Some(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionEnd::Protocol(_) => Some(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionEnd::BroadcastClosed => Some(Some(CloseReason {
            code: CloseCode::Away,
            description: Some("server shutting down".to_owned()),
        })),
        SessionEnd::ClientClosed(reason) => Some(reason.clone()),
        SessionEnd::StreamClosed | SessionEnd::Network(_) => None,
    }
}

async fn close_if_needed(session: Session, action: Option<Option<CloseReason>>) {
    if let Some(reason) = action {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "failed to close WebSocket session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
