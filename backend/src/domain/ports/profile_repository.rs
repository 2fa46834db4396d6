//! Driven port for profile persistence.

use async_trait::async_trait;

use crate::domain::{Error, Profile, UserId};

/// Storage for the 1:1 profile row created at sign-up.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Persist a new profile, failing with a conflict when one already
    /// exists for the user.
    async fn insert(&self, profile: &Profile) -> Result<(), Error>;

    /// Fetch one profile, `Ok(None)` when the user has none.
    async fn find(&self, user: &UserId) -> Result<Option<Profile>, Error>;

    /// Fetch the profiles for a set of users in one call.
    ///
    /// Missing users are simply absent from the result; the caller decides
    /// how to render photos whose author has no profile.
    async fn find_many(&self, users: &[UserId]) -> Result<Vec<Profile>, Error>;
}
