//! Port for reporting provisioning inconsistencies that need manual repair.

use tracing::error;

use crate::domain::{EmailAddress, UserId};

/// An identity left behind because its compensating delete failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedIdentity {
    pub user_id: UserId,
    pub email: EmailAddress,
    /// Why the profile step failed.
    pub profile_failure: String,
    /// Why the compensating delete failed.
    pub compensation_failure: String,
}

/// Sink for provisioning diagnostics.
#[cfg_attr(test, mockall::automock)]
pub trait ProvisioningDiagnostics: Send + Sync {
    /// Record an identity that exists without a profile.
    fn orphaned_identity(&self, event: &OrphanedIdentity);
}

/// Diagnostics sink that emits structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProvisioningDiagnostics;

impl ProvisioningDiagnostics for TracingProvisioningDiagnostics {
    fn orphaned_identity(&self, event: &OrphanedIdentity) {
        error!(
            event = "orphaned_identity",
            user_id = %event.user_id,
            email = %event.email,
            profile_failure = %event.profile_failure,
            compensation_failure = %event.compensation_failure,
            "identity has no profile and must be removed manually"
        );
    }
}
