//! Profile and identity records as seen by the domain.
//!
//! The identity store and the profile store each hold half of an account;
//! both halves are keyed by the same [`UserId`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountRequest, AccountStatus, EmailAddress, Gender, Role, RoleDetails, UserId};

/// Identity as reported by the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(example = "dr.molar@clinic.example")]
    pub email: String,
    /// Whether the email is confirmed. Provisioned identities always are.
    pub confirmed: bool,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Profile row shared by every role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(example = "dr.molar@clinic.example")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Filters for listing profiles. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    pub search: Option<String>,
}

impl UserFilter {
    /// Trimmed search text, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Whether `profile` passes every filter.
    ///
    /// Search is a case-insensitive substring match over first name, last
    /// name and email.
    pub fn matches(&self, profile: &UserProfile) -> bool {
        if self.role.is_some_and(|role| role != profile.role) {
            return false;
        }
        if self.status.is_some_and(|status| status != profile.status) {
            return false;
        }
        let Some(term) = self.search_term() else {
            return true;
        };
        let needle = term.to_lowercase();
        [&profile.first_name, &profile.last_name, &profile.email]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// Payload for the profile store's atomic create operation.
///
/// Role-specific fields that do not apply are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCreation {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub role: Role,
    pub status: AccountStatus,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub room_number: Option<String>,
    pub position: Option<String>,
    pub supervising_dentist_id: Option<UserId>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
}

impl ProfileCreation {
    /// Flatten a validated request for the identity `user_id`.
    pub fn from_request(user_id: UserId, request: &AccountRequest) -> Self {
        let mut creation = Self {
            user_id,
            email: request.email().clone(),
            first_name: request.first_name().to_owned(),
            last_name: request.last_name().to_owned(),
            phone: request.phone().map(str::to_owned),
            gender: request.gender(),
            role: request.role(),
            status: request.status(),
            specialization: None,
            license_number: None,
            room_number: None,
            position: None,
            supervising_dentist_id: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_number: None,
        };

        match request.details().clone() {
            RoleDetails::Administrator => {}
            RoleDetails::Dentist {
                specialization,
                license_number,
                room_number,
            } => {
                creation.specialization = Some(specialization);
                creation.license_number = Some(license_number);
                creation.room_number = Some(room_number);
            }
            RoleDetails::DentalStaff {
                position,
                supervising_dentist,
            } => {
                creation.position = Some(position);
                creation.supervising_dentist_id = supervising_dentist;
            }
            RoleDetails::Patient {
                address,
                emergency_contact_name,
                emergency_contact_number,
            } => {
                creation.address = Some(address);
                creation.emergency_contact_name = Some(emergency_contact_name);
                creation.emergency_contact_number = Some(emergency_contact_number);
            }
        }
        creation
    }
}

/// Account created by a successful provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProvisionedAccount {
    #[schema(value_type = String)]
    pub id: UserId,
    #[schema(value_type = String, example = "dr.molar@clinic.example")]
    pub email: EmailAddress,
    pub role: Role,
}

/// Account removed by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedUser {
    pub user_id: UserId,
}

/// Both halves of the caller's account, for troubleshooting sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DebugSnapshot {
    pub identity: Option<IdentityRecord>,
    pub profile: Option<UserProfile>,
}
