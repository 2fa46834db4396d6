//! Driven port for the external identity provider.

use async_trait::async_trait;

use crate::domain::{Error, Identity, SignInCredentials, UserId};

/// Credential registration, verification and session revocation.
///
/// The provider owns passwords and tokens; the domain only ever sees the
/// resulting [`Identity`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register new credentials, failing with a conflict when the email is
    /// already taken.
    async fn register(&self, credentials: &SignInCredentials) -> Result<Identity, Error>;

    /// Verify credentials and issue a fresh identity token.
    async fn authenticate(&self, credentials: &SignInCredentials) -> Result<Identity, Error>;

    /// Resolve a user id to its identity, `Ok(None)` when no live session
    /// token exists for it.
    async fn lookup(&self, user: &UserId) -> Result<Option<Identity>, Error>;

    /// Invalidate the user's current token.
    async fn revoke(&self, user: &UserId) -> Result<(), Error>;
}
