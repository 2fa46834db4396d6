//! WebSocket inbound adapter pushing feed change notices.
//!
//! Notices carry identifiers only; a client re-queries `GET /api/v1/photos`
//! whenever one arrives. Because the stream never transports user data, the
//! endpoint accepts unauthenticated upgrades.

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::error;

pub mod messages;
mod session;
pub mod state;

/// Handle the WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    body: Payload,
) -> actix_web::Result<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|err| {
        error!(error = %err, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;

    let notices = state.events.subscribe();
    actix_web::rt::spawn(session::run(session, stream, notices));
    Ok(response)
}
