//! DTOs for the hosted auth and REST APIs.
//!
//! Responses decode into these transport shapes first and are mapped into
//! domain records in one pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountStatus, Gender, IdentityRecord, ProfileCreation, Role, UserId, UserProfile,
};

#[derive(Debug, Serialize)]
pub(super) struct CreateIdentityDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) email_confirm: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) created_at: Option<DateTime<Utc>>,
}

impl AuthUserDto {
    pub(super) fn into_domain(self) -> Result<IdentityRecord, String> {
        let id = UserId::new(&self.id).map_err(|error| format!("user id {}: {error}", self.id))?;
        Ok(IdentityRecord {
            id,
            email: self.email.unwrap_or_default(),
            confirmed: self.email_confirmed_at.is_some(),
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) user: AuthUserDto,
}

/// Error bodies differ between the auth and REST APIs; take whichever
/// message field is present.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBodyDto {
    pub(super) fn message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateProfileRpcDto<'a> {
    p_user_id: &'a str,
    p_email: &'a str,
    p_first_name: &'a str,
    p_last_name: &'a str,
    p_phone: Option<&'a str>,
    p_gender: Option<&'static str>,
    p_role: &'static str,
    p_status: &'static str,
    p_specialization: Option<&'a str>,
    p_license_number: Option<&'a str>,
    p_room_number: Option<&'a str>,
    p_position: Option<&'a str>,
    p_supervising_dentist_id: Option<&'a str>,
    p_address: Option<&'a str>,
    p_emergency_contact_name: Option<&'a str>,
    p_emergency_contact_number: Option<&'a str>,
}

impl<'a> From<&'a ProfileCreation> for CreateProfileRpcDto<'a> {
    fn from(creation: &'a ProfileCreation) -> Self {
        Self {
            p_user_id: creation.user_id.as_ref(),
            p_email: creation.email.as_ref(),
            p_first_name: &creation.first_name,
            p_last_name: &creation.last_name,
            p_phone: creation.phone.as_deref(),
            p_gender: creation.gender.map(|gender| gender.as_str()),
            p_role: creation.role.as_str(),
            p_status: creation.status.as_str(),
            p_specialization: creation.specialization.as_deref(),
            p_license_number: creation.license_number.as_deref(),
            p_room_number: creation.room_number.as_deref(),
            p_position: creation.position.as_deref(),
            p_supervising_dentist_id: creation.supervising_dentist_id.as_ref().map(|id| id.as_ref()),
            p_address: creation.address.as_deref(),
            p_emergency_contact_name: creation.emergency_contact_name.as_deref(),
            p_emergency_contact_number: creation.emergency_contact_number.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileRowDto {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    role: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl ProfileRowDto {
    pub(super) fn into_domain(self) -> Result<UserProfile, String> {
        let id = UserId::new(&self.id).map_err(|error| format!("profile {}: {error}", self.id))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|error| format!("profile {id}: {error}"))?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<AccountStatus>)
            .transpose()
            .map_err(|error| format!("profile {id}: {error}"))?
            .unwrap_or_default();
        // Unknown stored genders are shown as unset rather than failing the row.
        let gender = self.gender.as_deref().and_then(|raw| raw.parse::<Gender>().ok());
        Ok(UserProfile {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            gender,
            role,
            status,
            created_at: self.created_at,
        })
    }
}
