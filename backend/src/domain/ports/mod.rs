//! Hexagonal ports.
//!
//! Driving ports ([`Accounts`], [`FeedQuery`], [`Uploads`]) are the use-case
//! surface inbound adapters call. Driven ports ([`IdentityProvider`],
//! [`ProfileRepository`], [`PhotoRepository`], [`ObjectStorage`],
//! [`FeedEvents`]) are the collaborators the domain services depend on;
//! outbound adapters implement them.

mod accounts;
mod feed_events;
mod feed_query;
mod identity_provider;
mod object_storage;
mod photo_repository;
mod profile_repository;
mod uploads;

pub use accounts::{Accounts, AuthenticatedSession};
pub use feed_events::{FeedEvent, FeedEvents};
pub use feed_query::FeedQuery;
pub use identity_provider::IdentityProvider;
pub use object_storage::ObjectStorage;
pub use photo_repository::PhotoRepository;
pub use profile_repository::ProfileRepository;
pub use uploads::{DraftView, StagedFileView, SubmitOutcome, Uploads};
