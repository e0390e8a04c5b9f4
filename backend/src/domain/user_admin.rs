//! Administration of existing accounts: listing, deletion and the debug view.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{
    AccessPolicy, IdentityStore, IdentityStoreError, ProfileStore, ProfileStoreError,
    UserAdministration, require_role,
};
use crate::domain::{DebugSnapshot, DeletedUser, Error, Role, UserFilter, UserId, UserProfile};

/// [`UserAdministration`] implementation over the store ports.
pub struct UserAdminService<I: ?Sized, P: ?Sized, A: ?Sized> {
    identities: Arc<I>,
    profiles: Arc<P>,
    policy: Arc<A>,
}

impl<I: ?Sized, P: ?Sized, A: ?Sized> UserAdminService<I, P, A> {
    pub fn new(identities: Arc<I>, profiles: Arc<P>, policy: Arc<A>) -> Self {
        Self {
            identities,
            profiles,
            policy,
        }
    }
}

fn map_profile_error(error: ProfileStoreError) -> Error {
    match error {
        ProfileStoreError::Denied { message } => {
            Error::forbidden(format!("profile store denied the request: {message}"))
        }
        other => Error::internal(other.to_string()),
    }
}

fn map_identity_error(error: IdentityStoreError) -> Error {
    Error::internal(error.to_string())
}

#[async_trait]
impl<I, P, A> UserAdministration for UserAdminService<I, P, A>
where
    I: IdentityStore + ?Sized,
    P: ProfileStore + ?Sized,
    A: AccessPolicy + ?Sized,
{
    async fn list_users(
        &self,
        principal: Option<&UserId>,
        filter: &UserFilter,
    ) -> Result<Vec<UserProfile>, Error> {
        require_role(self.policy.as_ref(), principal, Role::Administrator).await?;
        self.profiles
            .list_profiles(filter)
            .await
            .map_err(map_profile_error)
    }

    async fn delete_user(
        &self,
        principal: Option<&UserId>,
        target: &UserId,
    ) -> Result<DeletedUser, Error> {
        let admin = require_role(self.policy.as_ref(), principal, Role::Administrator).await?;
        if admin == *target {
            return Err(Error::invalid_request("administrators cannot delete their own account"));
        }

        let profile = self
            .profiles
            .find_profile(target)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::forbidden("user not found or access denied"))?;

        self.profiles
            .delete_role_details(target, profile.role)
            .await
            .map_err(map_profile_error)?;
        self.profiles
            .delete_profile(target)
            .await
            .map_err(map_profile_error)?;

        // Profile rows are already gone; failing here leaves a bare identity.
        if let Err(failure) = self.identities.delete_identity(target).await {
            error!(user_id = %target, error = %failure, "identity deletion failed after profile removal");
            return Err(map_identity_error(failure));
        }

        info!(user_id = %target, deleted_by = %admin, role = %profile.role, "account deleted");
        Ok(DeletedUser {
            user_id: target.clone(),
        })
    }

    async fn debug_snapshot(&self, principal: Option<&UserId>) -> Result<DebugSnapshot, Error> {
        let principal = principal.ok_or_else(|| Error::unauthorized("login required"))?;
        let identity = self
            .identities
            .find_identity(principal)
            .await
            .map_err(map_identity_error)?;
        let profile = self
            .profiles
            .find_profile(principal)
            .await
            .map_err(map_profile_error)?;
        Ok(DebugSnapshot { identity, profile })
    }
}

#[cfg(test)]
#[path = "user_admin_tests.rs"]
mod tests;
