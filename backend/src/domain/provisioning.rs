//! Account provisioning across the identity and profile stores.
//!
//! Creating an account touches two stores that share no transaction. The
//! service runs a two-step saga: create the identity, then create the
//! profile. When the profile step fails the identity is deleted again so no
//! half-provisioned account remains. A failed compensation is reported
//! through [`ProvisioningDiagnostics`] instead of the caller, who already
//! receives the profile failure.
//!
//! After authorisation the whole saga runs on its own task. A caller that
//! disconnects mid-request therefore cannot strand an identity without at
//! least one attempt at its profile (or its removal).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccessPolicy, AccountProvisioning, IdentityStore, OrphanedIdentity, ProfileStore,
    ProvisioningDiagnostics, require_role,
};
use crate::domain::{
    AccountRequest, EmailAddress, Error, ProfileCreation, ProvisionedAccount, Role, TraceId,
    UserId,
};

/// Steps of the provisioning saga, used to label log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaPhase {
    IdentityCreation,
    ProfileCreation,
    Compensation,
}

impl SagaPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdentityCreation => "identity_creation",
            Self::ProfileCreation => "profile_creation",
            Self::Compensation => "compensation",
        }
    }
}

impl fmt::Display for SagaPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// [`AccountProvisioning`] implementation over the store ports.
pub struct ProvisioningService<I: ?Sized, P: ?Sized, A: ?Sized, D: ?Sized> {
    identities: Arc<I>,
    profiles: Arc<P>,
    policy: Arc<A>,
    diagnostics: Arc<D>,
}

impl<I: ?Sized, P: ?Sized, A: ?Sized, D: ?Sized> ProvisioningService<I, P, A, D> {
    /// Create a service over the given stores, policy and diagnostics sink.
    pub fn new(identities: Arc<I>, profiles: Arc<P>, policy: Arc<A>, diagnostics: Arc<D>) -> Self {
        Self {
            identities,
            profiles,
            policy,
            diagnostics,
        }
    }
}

#[async_trait]
impl<I, P, A, D> AccountProvisioning for ProvisioningService<I, P, A, D>
where
    I: IdentityStore + ?Sized + 'static,
    P: ProfileStore + ?Sized + 'static,
    A: AccessPolicy + ?Sized,
    D: ProvisioningDiagnostics + ?Sized + 'static,
{
    async fn provision(
        &self,
        principal: Option<&UserId>,
        request: AccountRequest,
    ) -> Result<ProvisionedAccount, Error> {
        let admin = require_role(self.policy.as_ref(), principal, Role::Administrator).await?;
        let email = request.email().clone();
        let role = request.role();

        let saga = ProvisioningSaga {
            identities: Arc::clone(&self.identities),
            profiles: Arc::clone(&self.profiles),
            diagnostics: Arc::clone(&self.diagnostics),
            request,
        };
        let id = tokio::spawn(TraceId::propagate(saga.run()))
            .await
            .map_err(|error| Error::internal(format!("provisioning task failed: {error}")))??;

        info!(
            user_id = %id,
            email = %email,
            role = %role,
            provisioned_by = %admin,
            "account provisioned"
        );
        Ok(ProvisionedAccount { id, email, role })
    }
}

enum ProfileFailure {
    /// The store answered but refused the profile.
    Rejected(String),
    /// The store could not complete the call.
    Transport(String),
}

impl ProfileFailure {
    fn reason(&self) -> &str {
        match self {
            Self::Rejected(reason) | Self::Transport(reason) => reason,
        }
    }

    fn into_error(self) -> Error {
        match self {
            Self::Rejected(reason) => {
                Error::profile_creation_failed(format!("profile creation failed: {reason}"))
            }
            Self::Transport(_) => Error::profile_creation_failed("profile creation failed"),
        }
    }
}

/// Both saga steps plus compensation; owns everything it needs so it can be
/// spawned.
struct ProvisioningSaga<I: ?Sized, P: ?Sized, D: ?Sized> {
    identities: Arc<I>,
    profiles: Arc<P>,
    diagnostics: Arc<D>,
    request: AccountRequest,
}

impl<I, P, D> ProvisioningSaga<I, P, D>
where
    I: IdentityStore + ?Sized,
    P: ProfileStore + ?Sized,
    D: ProvisioningDiagnostics + ?Sized,
{
    async fn run(self) -> Result<UserId, Error> {
        let email = self.request.email();
        debug!(phase = %SagaPhase::IdentityCreation, email = %email, "saga phase started");
        let identity = self
            .identities
            .create_identity(email, self.request.password())
            .await
            .map_err(|error| {
                warn!(email = %email, error = %error, "identity creation failed");
                Error::identity_creation_failed(error.to_string())
            })?;

        let creation = ProfileCreation::from_request(identity.id.clone(), &self.request);
        debug!(phase = %SagaPhase::ProfileCreation, user_id = %identity.id, "saga phase started");
        let failure = match self.profiles.create_profile(&creation).await {
            Ok(outcome) if outcome.success => return Ok(identity.id),
            Ok(outcome) => ProfileFailure::Rejected(
                outcome
                    .error
                    .unwrap_or_else(|| "profile store reported failure".to_owned()),
            ),
            Err(error) => ProfileFailure::Transport(error.to_string()),
        };
        warn!(user_id = %identity.id, reason = failure.reason(), "profile creation failed");

        self.compensate(&identity.id, email, failure.reason()).await;
        Err(failure.into_error())
    }

    async fn compensate(&self, user_id: &UserId, email: &EmailAddress, profile_failure: &str) {
        debug!(phase = %SagaPhase::Compensation, user_id = %user_id, "saga phase started");
        match self.identities.delete_identity(user_id).await {
            Ok(()) => info!(user_id = %user_id, "identity removed after profile failure"),
            Err(error) => self.diagnostics.orphaned_identity(&OrphanedIdentity {
                user_id: user_id.clone(),
                email: email.clone(),
                profile_failure: profile_failure.to_owned(),
                compensation_failure: error.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "provisioning_tests.rs"]
mod tests;
