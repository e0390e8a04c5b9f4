//! Account requests: the validated input to provisioning.
//!
//! Inbound adapters build an [`AccountRequestDraft`] from whatever payload
//! they receive and convert it with [`AccountRequest::try_from`]. All checks
//! run here, before any external store is touched, so an invalid request can
//! never leave partial state behind.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{AccountStatus, EmailAddress, Gender, Role, UserId, UserValidationError};

/// Wire names of the fields validated below; shared with error details.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const ROLE: &str = "role";
    pub const STATUS: &str = "status";
    pub const GENDER: &str = "gender";
    pub const SPECIALIZATION: &str = "specialization";
    pub const LICENSE_NUMBER: &str = "licenseNumber";
    pub const ROOM_NUMBER: &str = "roomNumber";
    pub const POSITION: &str = "position";
    pub const SUPERVISING_DENTIST_ID: &str = "supervisingDentistId";
    pub const ADDRESS: &str = "address";
    pub const EMERGENCY_CONTACT_NAME: &str = "emergencyContactName";
    pub const EMERGENCY_CONTACT_NUMBER: &str = "emergencyContactNumber";
}

/// Reasons an [`AccountRequestDraft`] is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountRequestError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("{field}: {source}")]
    InvalidValue {
        field: &'static str,
        #[source]
        source: UserValidationError,
    },
}

impl AccountRequestError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidValue { field, .. } => field,
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::InvalidValue { source, .. } => match source {
                UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => {
                    "invalid_email"
                }
                UserValidationError::EmptyId | UserValidationError::InvalidId => "invalid_uuid",
                UserValidationError::UnknownRole { .. } => "invalid_role",
                UserValidationError::UnknownStatus { .. } => "invalid_status",
                UserValidationError::UnknownGender { .. } => "invalid_gender",
            },
        }
    }
}

/// Unvalidated account request as received from a caller.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccountRequestDraft {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub room_number: Option<String>,
    pub position: Option<String>,
    pub supervising_dentist_id: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
}

impl fmt::Debug for AccountRequestDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRequestDraft")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Fields that only apply to one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDetails {
    Administrator,
    Dentist {
        specialization: String,
        license_number: String,
        room_number: String,
    },
    DentalStaff {
        position: String,
        supervising_dentist: Option<UserId>,
    },
    Patient {
        address: String,
        emergency_contact_name: String,
        emergency_contact_number: String,
    },
}

impl RoleDetails {
    /// Role these details belong to.
    pub fn role(&self) -> Role {
        match self {
            Self::Administrator => Role::Administrator,
            Self::Dentist { .. } => Role::Dentist,
            Self::DentalStaff { .. } => Role::DentalStaff,
            Self::Patient { .. } => Role::Patient,
        }
    }
}

/// Validated request to create an account.
///
/// ## Invariants
/// - email, password, first name and last name are present and non-blank.
/// - `details` carries every field its role requires.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountRequest {
    email: EmailAddress,
    password: Zeroizing<String>,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    gender: Option<Gender>,
    status: AccountStatus,
    details: RoleDetails,
}

impl AccountRequest {
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Temporary password handed to the identity store.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn role(&self) -> Role {
        self.details.role()
    }

    pub fn details(&self) -> &RoleDetails {
        &self.details
    }
}

impl fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("status", &self.status)
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AccountRequestError> {
    present(value).ok_or(AccountRequestError::MissingField { field })
}

fn invalid(field: &'static str) -> impl FnOnce(UserValidationError) -> AccountRequestError {
    move |source| AccountRequestError::InvalidValue { field, source }
}

impl TryFrom<AccountRequestDraft> for AccountRequest {
    type Error = AccountRequestError;

    fn try_from(draft: AccountRequestDraft) -> Result<Self, Self::Error> {
        let email = required(draft.email, fields::EMAIL)?;
        let email = EmailAddress::new(email).map_err(invalid(fields::EMAIL))?;
        let password = draft
            .password
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(AccountRequestError::MissingField {
                field: fields::PASSWORD,
            })?;
        let first_name = required(draft.first_name, fields::FIRST_NAME)?;
        let last_name = required(draft.last_name, fields::LAST_NAME)?;
        let role: Role = required(draft.role, fields::ROLE)?
            .parse()
            .map_err(invalid(fields::ROLE))?;

        let status = present(draft.status)
            .map(|raw| raw.parse::<AccountStatus>())
            .transpose()
            .map_err(invalid(fields::STATUS))?
            .unwrap_or_default();
        let gender = present(draft.gender)
            .map(|raw| raw.parse::<Gender>())
            .transpose()
            .map_err(invalid(fields::GENDER))?;

        let details = match role {
            Role::Administrator => RoleDetails::Administrator,
            Role::Dentist => RoleDetails::Dentist {
                specialization: required(draft.specialization, fields::SPECIALIZATION)?,
                license_number: required(draft.license_number, fields::LICENSE_NUMBER)?,
                room_number: required(draft.room_number, fields::ROOM_NUMBER)?,
            },
            Role::DentalStaff => RoleDetails::DentalStaff {
                position: required(draft.position, fields::POSITION)?,
                supervising_dentist: present(draft.supervising_dentist_id)
                    .map(UserId::new)
                    .transpose()
                    .map_err(invalid(fields::SUPERVISING_DENTIST_ID))?,
            },
            Role::Patient => RoleDetails::Patient {
                address: required(draft.address, fields::ADDRESS)?,
                emergency_contact_name: required(
                    draft.emergency_contact_name,
                    fields::EMERGENCY_CONTACT_NAME,
                )?,
                emergency_contact_number: required(
                    draft.emergency_contact_number,
                    fields::EMERGENCY_CONTACT_NUMBER,
                )?,
            },
        };

        Ok(Self {
            email,
            password: Zeroizing::new(password),
            first_name,
            last_name,
            phone: present(draft.phone),
            gender,
            status,
            details,
        })
    }
}

#[cfg(test)]
#[path = "account_request_tests.rs"]
mod tests;
