//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod feed;
pub mod health;
pub mod session;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod uploads;

pub use error::ApiResult;
