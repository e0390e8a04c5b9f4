//! Driving port for login use-cases.
//!
//! Inbound adapters call it to turn credentials into an authenticated user id
//! without knowing which identity backend verifies the password.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
