//! Inbound adapters: HTTP handlers and the WebSocket notice stream.

pub mod http;
pub mod ws;
