//! In-memory identity provider.
//!
//! Passwords are stored as salted SHA-256 digests and session tokens are
//! random hex strings rotated on every authentication. State lives in a
//! mutex-guarded map, so accounts vanish on restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::ports::IdentityProvider;
use crate::domain::{EmailAddress, Error, Identity, SignInCredentials, UserId};

struct Account {
    id: UserId,
    email: EmailAddress,
    salt: String,
    digest: String,
    token: Option<String>,
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0_u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Development and test identity provider holding accounts in memory.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<EmailAddress, Account>>,
}

impl MemoryIdentityProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<EmailAddress, Account>>, Error> {
        self.accounts
            .lock()
            .map_err(|_| Error::internal("identity state is poisoned"))
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn register(&self, credentials: &SignInCredentials) -> Result<Identity, Error> {
        let mut accounts = self.lock()?;
        if accounts.contains_key(credentials.email()) {
            return Err(Error::conflict("an account already exists for this email"));
        }

        let salt = random_hex(16);
        let token = random_hex(32);
        let account = Account {
            id: UserId::random(),
            email: credentials.email().clone(),
            salt: salt.clone(),
            digest: password_digest(&salt, credentials.password()),
            token: Some(token.clone()),
        };
        let identity = Identity::new(account.id.clone(), account.email.clone(), token);
        accounts.insert(credentials.email().clone(), account);
        Ok(identity)
    }

    async fn authenticate(&self, credentials: &SignInCredentials) -> Result<Identity, Error> {
        let mut accounts = self.lock()?;
        // Identical error for unknown email and wrong password.
        let account = accounts
            .get_mut(credentials.email())
            .ok_or_else(|| Error::unauthorized("invalid email or password"))?;

        if password_digest(&account.salt, credentials.password()) != account.digest {
            return Err(Error::unauthorized("invalid email or password"));
        }

        let token = random_hex(32);
        account.token = Some(token.clone());
        Ok(Identity::new(account.id.clone(), account.email.clone(), token))
    }

    async fn lookup(&self, user: &UserId) -> Result<Option<Identity>, Error> {
        let accounts = self.lock()?;
        let live = accounts.values().find_map(|account| {
            if &account.id != user {
                return None;
            }
            account
                .token
                .as_ref()
                .map(|token| Identity::new(account.id.clone(), account.email.clone(), token))
        });
        Ok(live)
    }

    async fn revoke(&self, user: &UserId) -> Result<(), Error> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.values_mut().find(|account| &account.id == user) {
            account.token = None;
        }
        Ok(())
    }
}
