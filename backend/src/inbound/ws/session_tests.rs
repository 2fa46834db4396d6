//! WebSocket session loop tests.

use super::*;
use crate::domain::ports::{FeedEvent, FeedEvents};
use crate::domain::{PhotoId, UserId};
use crate::inbound::ws;
use crate::inbound::ws::state::WsState;
use crate::outbound::FeedBroadcaster;
use actix_web::{App, HttpServer, dev::Server, dev::ServerHandle};
use awc::{BoxedSocket, ws::Codec, ws::Frame};
use futures_util::StreamExt;
use rstest::{fixture, rstest};
use serde_json::Value;
use std::sync::Arc;

async fn start_server_with_capacity(capacity: usize) -> (String, Server, Arc<FeedBroadcaster>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let events = Arc::new(FeedBroadcaster::new(capacity));
    let ws_state = WsState::new(Arc::clone(&events) as _);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(actix_web::web::Data::new(ws_state.clone()))
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    (format!("http://{addr}"), server, events)
}

#[fixture]
async fn start_ws_server() -> (String, Server, Arc<FeedBroadcaster>) {
    start_server_with_capacity(16).await
}

async fn connect(url: &str) -> actix_codec::Framed<BoxedSocket, Codec> {
    let (_resp, socket) = awc::Client::default()
        .ws(format!("{url}/ws"))
        .connect()
        .await
        .expect("websocket connect");
    socket
}

#[fixture]
async fn ws_client(
    #[future] start_ws_server: (String, Server, Arc<FeedBroadcaster>),
) -> (
    actix_codec::Framed<BoxedSocket, Codec>,
    ServerHandle,
    Arc<FeedBroadcaster>,
) {
    let (url, server, events) = start_ws_server.await;
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (connect(&url).await, handle, events)
}

async fn next_text_frame(socket: &mut actix_codec::Framed<BoxedSocket, Codec>) -> Vec<u8> {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return bytes.to_vec(),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

#[rstest]
#[actix_rt::test]
async fn forwards_photo_added_notices(
    #[future] ws_client: (
        actix_codec::Framed<BoxedSocket, Codec>,
        ServerHandle,
        Arc<FeedBroadcaster>,
    ),
) {
    let (mut socket, _server, events) = ws_client.await;
    let photo_id = PhotoId::random();
    let owner = UserId::random();
    events.publish(FeedEvent::PhotoAdded {
        photo_id: photo_id.clone(),
        owner: owner.clone(),
    });

    let text = next_text_frame(&mut socket).await;
    let value: Value = serde_json::from_slice(&text).expect("json");
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
#[actix_rt::test]
async fn lagged_subscriber_is_told_to_resync() {
    let (url, server, events) = start_server_with_capacity(1).await;
    let _handle = server.handle();
    actix_web::rt::spawn(server);
    let mut socket = connect(&url).await;

    // Publish more notices than the channel buffers without yielding, so
    // the session falls behind and its receiver reports lag.
    for _ in 0..8 {
        events.publish(FeedEvent::PhotoAdded {
            photo_id: PhotoId::random(),
            owner: UserId::random(),
        });
    }

    let observed_resync = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let text = next_text_frame(&mut socket).await;
            let value: Value = serde_json::from_slice(&text).expect("json");
            if value.get("type").and_then(Value::as_str) == Some("resync") {
                break;
            }
        }
    })
    .await;
    assert!(observed_resync.is_ok(), "no resync notice before timeout");
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages(
    #[future] ws_client: (
        actix_codec::Framed<BoxedSocket, Codec>,
        ServerHandle,
        Arc<FeedBroadcaster>,
    ),
) {
    let (mut socket, _server, _events) = ws_client.await;
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 3).await;

    let observed_close = tokio::time::timeout(Duration::from_secs(2), async {
        let mut observed = None;
        while let Some(frame) = socket.next().await {
            let frame = frame.expect("frame");
            match frame {
                Frame::Ping(_) | Frame::Pong(_) => continue,
                Frame::Close(reason) => {
                    observed = reason;
                    break;
                }
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
        observed
    })
    .await
    .expect("close frame missing within timeout")
    .expect("close frame missing after timeout");

    assert_eq!(observed_close.code, CloseCode::Normal);
    assert_eq!(
        observed_close.description.as_deref(),
        Some("heartbeat timeout")
    );
}
