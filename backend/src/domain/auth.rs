//! Authentication primitives: login credentials and the identity-backed
//! login service.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::{IdentityStore, IdentityStoreError, LoginService};
use crate::domain::{Error, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and lower-cased, and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use clinic_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Clinic.Example ", "pw").unwrap();
/// assert_eq!(creds.email(), "admin@clinic.example");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalised.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the identity lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// [`LoginService`] that verifies passwords against the identity store.
pub struct IdentityLoginService<I: ?Sized> {
    identities: Arc<I>,
}

impl<I: ?Sized> IdentityLoginService<I> {
    /// Build the service over an identity store.
    pub fn new(identities: Arc<I>) -> Self {
        Self { identities }
    }
}

#[async_trait]
impl<I> LoginService for IdentityLoginService<I>
where
    I: IdentityStore + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        self.identities
            .verify_password(credentials.email(), credentials.password())
            .await
            .map_err(|error| match error {
                IdentityStoreError::InvalidCredentials | IdentityStoreError::NotFound { .. } => {
                    Error::unauthorized("invalid credentials")
                }
                other => {
                    warn!(error = %other, "identity store unavailable during login");
                    Error::internal(format!("identity store error: {other}"))
                }
            })
    }
}
