//! Authentication primitives: validated e-mail credentials and sign-up data.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::user::{DisplayName, UserValidationError};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like `local@domain`.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
    /// Display name failed validation at sign-up.
    DisplayName(UserValidationError),
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like you@example.com"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::DisplayName(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

impl From<UserValidationError> for AuthValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::DisplayName(value)
    }
}

/// Normalised e-mail address used as the account login.
///
/// ## Invariants
/// - Trimmed and lowercased.
/// - Exactly one `@` with non-empty local and domain parts, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from raw input.
    pub fn new(email: impl AsRef<str>) -> Result<Self, AuthValidationError> {
        Self::from_owned(email.as_ref().to_owned())
    }

    fn from_owned(email: String) -> Result<Self, AuthValidationError> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }

        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let shape_ok = !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !normalized.chars().any(char::is_whitespace);
        if !shape_ok {
            return Err(AuthValidationError::InvalidEmail);
        }

        Ok(Self(normalized))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AuthValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Validated sign-in credentials used by the accounts service.
///
/// ## Invariants
/// - `email` satisfies [`EmailAddress`] validation.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct SignInCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up payload: credentials plus the mandatory display name.
///
/// The display name is checked *before* any call to the authentication
/// port, so an empty name never reaches the network.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    credentials: SignInCredentials,
    display_name: DisplayName,
}

impl SignUpRequest {
    /// Construct a sign-up request from raw form inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Self, AuthValidationError> {
        let credentials = SignInCredentials::try_from_parts(email, password)?;
        let display_name = DisplayName::new(display_name)?;

        Ok(Self {
            credentials,
            display_name,
        })
    }

    /// Credentials to register with the authentication port.
    pub fn credentials(&self) -> &SignInCredentials {
        &self.credentials
    }

    /// Display name for the new profile.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }
}
