//! Shared photo gallery backend.
//!
//! Hexagonal layout: `domain` holds value types, services and ports;
//! `inbound` holds the HTTP and WebSocket adapters; `outbound` holds the
//! identity, persistence, storage and broadcast adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
