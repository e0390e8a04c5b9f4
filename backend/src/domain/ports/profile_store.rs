//! Port for the external profile store (profile rows and role detail rows).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ProfileCreation, Role, UserFilter, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile store adapters.
    pub enum ProfileStoreError {
        /// The store could not be reached or timed out.
        Connection { message: String } => "profile store connection failed: {message}",
        /// A query or mutation failed while executing.
        Query { message: String } => "profile store query failed: {message}",
        /// Row-level policy refused the operation.
        Denied { message: String } => "profile store denied the request: {message}",
    }
}

/// Result reported by the atomic profile-creation operation.
///
/// The operation can complete at the transport level yet still report a
/// logical failure (for example a uniqueness constraint enforced inside the
/// store); `success == false` carries that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCreationOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ProfileCreationOutcome {
    /// Successful outcome.
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Logical failure with a reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }
}

/// Driven port over the profile store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create the profile row and its role detail row in one atomic call.
    async fn create_profile(
        &self,
        profile: &ProfileCreation,
    ) -> Result<ProfileCreationOutcome, ProfileStoreError>;

    /// Fetch a single profile.
    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError>;

    /// List profiles matching `filter`, newest first.
    async fn list_profiles(&self, filter: &UserFilter)
    -> Result<Vec<UserProfile>, ProfileStoreError>;

    /// Delete the role-specific detail row (no-op for administrators).
    async fn delete_role_details(&self, id: &UserId, role: Role) -> Result<(), ProfileStoreError>;

    /// Delete the profile row.
    async fn delete_profile(&self, id: &UserId) -> Result<(), ProfileStoreError>;
}
