//! Driving port for account use-cases.
//!
//! Inbound adapters call this port to sign users up, in, and out without
//! knowing which identity provider or profile store backs it. Handler tests
//! substitute a test double instead of wiring real infrastructure.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Profile, SignInCredentials, SignUpRequest, UserId};

/// The authenticated view of an account: the identity plus its profile.
///
/// The profile is optional because a sign-up can succeed at the identity
/// provider and then fail to persist the profile row; such accounts still
/// authenticate and render with placeholder attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    identity: Identity,
    profile: Option<Profile>,
}

impl AuthenticatedSession {
    /// Pair an identity with its (possibly missing) profile.
    pub fn new(identity: Identity, profile: Option<Profile>) -> Self {
        Self { identity, profile }
    }

    /// The authenticated identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The profile created at sign-up, when it resolved.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }
}

/// Domain use-case port for account management.
#[async_trait]
pub trait Accounts: Send + Sync {
    /// Register a new account and return its authenticated session.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthenticatedSession, Error>;

    /// Authenticate existing credentials.
    async fn sign_in(&self, credentials: &SignInCredentials)
    -> Result<AuthenticatedSession, Error>;

    /// Revoke the server-side session for a user.
    ///
    /// Best effort: implementations log and swallow provider failures so the
    /// caller can always clear its own cookie state.
    async fn sign_out(&self, user: &UserId);

    /// Resolve the authenticated view for a previously issued session.
    ///
    /// Returns `Ok(None)` when the session no longer maps to a live
    /// identity, e.g. after sign-out from another tab.
    async fn session_for(&self, user: &UserId) -> Result<Option<AuthenticatedSession>, Error>;
}
