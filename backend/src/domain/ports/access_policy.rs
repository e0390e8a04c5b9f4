//! Authorisation capability consulted before privileged operations.
//!
//! This is the single application-level source of truth for "who holds which
//! role". Row-level security in the profile store still applies underneath.

use async_trait::async_trait;

use crate::domain::{Error, Role, UserId};

/// Resolves the role held by an authenticated principal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Stored role of `principal`, or `None` when no profile exists.
    async fn role_of(&self, principal: &UserId) -> Result<Option<Role>, Error>;
}

/// Require an authenticated principal holding `required`.
///
/// Missing principal maps to `Unauthorized`; any other role, or no profile at
/// all, maps to `Forbidden`.
pub async fn require_role<P>(
    policy: &P,
    principal: Option<&UserId>,
    required: Role,
) -> Result<UserId, Error>
where
    P: AccessPolicy + ?Sized,
{
    let principal = principal.ok_or_else(|| Error::unauthorized("login required"))?;
    match policy.role_of(principal).await? {
        Some(role) if role == required => Ok(principal.clone()),
        Some(_) | None => Err(Error::forbidden(format!("{required} role required"))),
    }
}
