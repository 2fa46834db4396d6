//! Account service: sign-up, sign-in, sign-out and session resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::ports::{Accounts, AuthenticatedSession, IdentityProvider, ProfileRepository};
use super::user::{AvatarColor, Profile};
use super::{Error, SignInCredentials, SignUpRequest, UserId};

/// Orchestrates the identity provider and the profile store.
///
/// Profile persistence is subordinate to identity: once the provider has
/// registered or verified credentials the caller is signed in, even when
/// the profile row cannot be written or read. Those accounts render with
/// placeholder attribution until the profile resolves again.
pub struct AccountService {
    identities: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
}

impl AccountService {
    /// Wire the service to its driven ports.
    pub fn new(identities: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            identities,
            profiles,
        }
    }

    async fn profile_for(&self, user: &UserId) -> Option<Profile> {
        match self.profiles.find(user).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(user = %user, error = %err, "profile lookup failed; using placeholder");
                None
            }
        }
    }
}

#[async_trait]
impl Accounts for AccountService {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthenticatedSession, Error> {
        let identity = self.identities.register(request.credentials()).await?;

        let profile = Profile::new(
            identity.id().clone(),
            request.display_name().clone(),
            AvatarColor::from_palette(),
        );
        let profile = match self.profiles.insert(&profile).await {
            Ok(()) => Some(profile),
            Err(err) => {
                // The identity already exists; losing the profile must not
                // undo the sign-up.
                warn!(user = %identity.id(), error = %err, "profile insert failed at sign-up");
                None
            }
        };

        Ok(AuthenticatedSession::new(identity, profile))
    }

    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<AuthenticatedSession, Error> {
        let identity = self.identities.authenticate(credentials).await?;
        let profile = self.profile_for(identity.id()).await;
        Ok(AuthenticatedSession::new(identity, profile))
    }

    async fn sign_out(&self, user: &UserId) {
        if let Err(err) = self.identities.revoke(user).await {
            warn!(user = %user, error = %err, "session revocation failed; cookie cleared anyway");
        }
    }

    async fn session_for(&self, user: &UserId) -> Result<Option<AuthenticatedSession>, Error> {
        let Some(identity) = self.identities.lookup(user).await? else {
            return Ok(None);
        };
        let profile = self.profile_for(identity.id()).await;
        Ok(Some(AuthenticatedSession::new(identity, profile)))
    }
}
