//! [`AccessPolicy`] backed by the role stored on each profile.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{AccessPolicy, ProfileStore, ProfileStoreError};
use crate::domain::{Error, Role, UserId};

/// Reads the principal's role from the profile store.
pub struct ProfileRoleAccessPolicy<P: ?Sized> {
    profiles: Arc<P>,
}

impl<P: ?Sized> ProfileRoleAccessPolicy<P> {
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl<P> AccessPolicy for ProfileRoleAccessPolicy<P>
where
    P: ProfileStore + ?Sized,
{
    async fn role_of(&self, principal: &UserId) -> Result<Option<Role>, Error> {
        match self.profiles.find_profile(principal).await {
            Ok(profile) => Ok(profile.map(|profile| profile.role)),
            // Row-level security hides rows the caller may not read.
            Err(ProfileStoreError::Denied { .. }) => Ok(None),
            Err(other) => Err(Error::internal(format!("role lookup failed: {other}"))),
        }
    }
}
