//! Driving port for creating clinic accounts.

use async_trait::async_trait;

use crate::domain::{AccountRequest, Error, ProvisionedAccount, UserId};

/// Use-case port for provisioning an identity plus its profile.
#[async_trait]
pub trait AccountProvisioning: Send + Sync {
    /// Create the account described by `request` on behalf of `principal`.
    ///
    /// `principal` is `None` when the caller has no session.
    async fn provision(
        &self,
        principal: Option<&UserId>,
        request: AccountRequest,
    ) -> Result<ProvisionedAccount, Error>;
}
