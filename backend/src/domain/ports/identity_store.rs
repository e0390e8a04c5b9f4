//! Port for the external identity store (credentials and confirmation state).

use async_trait::async_trait;

use crate::domain::{EmailAddress, IdentityRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity store adapters.
    pub enum IdentityStoreError {
        /// The store could not be reached or timed out.
        Connection { message: String } => "identity store connection failed: {message}",
        /// The store refused the request (duplicate email, weak password, ...).
        Rejected { message: String } => "{message}",
        /// No identity exists for the identifier.
        NotFound { id: String } => "identity {id} not found",
        /// Email and password did not match.
        InvalidCredentials => "invalid credentials",
        /// The store answered with a payload the adapter could not read.
        Decode { message: String } => "identity store response could not be decoded: {message}",
    }
}

/// Driven port over the identity store.
///
/// Every identity created through this port is confirmed immediately; there
/// is no email verification round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Create a confirmed identity for `email` with the given password.
    async fn create_identity(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<IdentityRecord, IdentityStoreError>;

    /// Remove an identity. Used for compensation and account deletion.
    async fn delete_identity(&self, id: &UserId) -> Result<(), IdentityStoreError>;

    /// Fetch an identity by identifier.
    async fn find_identity(&self, id: &UserId)
    -> Result<Option<IdentityRecord>, IdentityStoreError>;

    /// Check a password and return the matching identity id.
    async fn verify_password(&self, email: &str, password: &str)
    -> Result<UserId, IdentityStoreError>;
}
