//! Driving port for administering existing accounts.

use async_trait::async_trait;

use crate::domain::{DebugSnapshot, DeletedUser, Error, UserFilter, UserId, UserProfile};

/// Use-case port behind the admin user endpoints.
#[async_trait]
pub trait UserAdministration: Send + Sync {
    /// List profiles visible to an administrator.
    async fn list_users(
        &self,
        principal: Option<&UserId>,
        filter: &UserFilter,
    ) -> Result<Vec<UserProfile>, Error>;

    /// Delete an account: role details, then profile, then identity.
    async fn delete_user(
        &self,
        principal: Option<&UserId>,
        target: &UserId,
    ) -> Result<DeletedUser, Error>;

    /// The caller's identity and profile side by side.
    async fn debug_snapshot(&self, principal: Option<&UserId>) -> Result<DebugSnapshot, Error>;
}
