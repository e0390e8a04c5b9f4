//! Domain ports: the edges of the hexagon.
//!
//! Driving ports (`AccountProvisioning`, `UserAdministration`,
//! `LoginService`) are what inbound adapters call. Driven ports
//! (`IdentityStore`, `ProfileStore`, `ProvisioningDiagnostics`) are what the
//! domain needs from infrastructure. `AccessPolicy` is the one authorisation
//! capability shared by both sides.

mod macros;
pub(crate) use macros::define_port_error;

mod access_policy;
mod account_provisioning;
mod identity_store;
mod login_service;
mod profile_store;
mod provisioning_diagnostics;
mod user_administration;

#[cfg(test)]
pub use access_policy::MockAccessPolicy;
pub use access_policy::{AccessPolicy, require_role};
pub use account_provisioning::AccountProvisioning;
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{IdentityStore, IdentityStoreError};
pub use login_service::LoginService;
#[cfg(test)]
pub use profile_store::MockProfileStore;
pub use profile_store::{ProfileCreationOutcome, ProfileStore, ProfileStoreError};
#[cfg(test)]
pub use provisioning_diagnostics::MockProvisioningDiagnostics;
pub use provisioning_diagnostics::{
    OrphanedIdentity, ProvisioningDiagnostics, TracingProvisioningDiagnostics,
};
pub use user_administration::UserAdministration;
