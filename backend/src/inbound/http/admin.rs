//! Administrator endpoints: account provisioning, listing and removal.
//!
//! ```text
//! POST   /api/v1/admin/create-user
//! GET    /api/v1/admin/users?role=dentist&status=active&search=molar
//! DELETE /api/v1/admin/users?userId=3fa85f64-5717-4562-b3fc-2c963f66afa6
//! GET    /api/v1/admin/debug
//! ```
//!
//! Handlers check the administrator role before touching the request
//! payload, so callers without that role never see validation errors. The
//! services behind [`HttpState`] enforce the same rule again.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::require_role;
use crate::domain::{
    AccountRequest, AccountRequestDraft, AccountStatus, DebugSnapshot, Error, ProvisionedAccount,
    Role, UserFilter, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, account_request_error, decode_json_body, parse_optional, parse_user_id,
};

const ROLE_FIELD: FieldName = FieldName::new("role");
const STATUS_FIELD: FieldName = FieldName::new("status");
const USER_ID_FIELD: FieldName = FieldName::new("userId");

/// Account request body for `POST /api/v1/admin/create-user`.
///
/// Every field is optional on the wire so that validation can name the
/// missing one instead of failing JSON decoding.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "dr.molar@clinic.example")]
    pub email: Option<String>,
    /// Temporary password; the identity is created already confirmed.
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "female")]
    pub gender: Option<String>,
    #[schema(example = "dentist")]
    pub role: Option<String>,
    #[schema(example = "active")]
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

impl From<CreateUserRequest> for AccountRequestDraft {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            email: value.email,
            password: value.password,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            gender: value.gender,
            role: value.role,
            status: value.status,
            specialization: value.specialization,
            license_number: value.license_number,
            room_number: value.room_number,
            position: value.position,
            supervising_dentist_id: value.supervising_dentist_id,
            address: value.address,
            emergency_contact_name: value.emergency_contact_name,
            emergency_contact_number: value.emergency_contact_number,
        }
    }
}

/// Response body for a provisioned account.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
    pub success: bool,
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user: ProvisionedAccount,
}

/// Query parameters for `GET /api/v1/admin/users`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Only profiles holding this role.
    pub role: Option<String>,
    /// Only profiles in this lifecycle status.
    pub status: Option<String>,
    /// Case-insensitive substring of first name, last name or email.
    pub search: Option<String>,
}

impl ListUsersQuery {
    fn into_filter(self) -> Result<UserFilter, Error> {
        Ok(UserFilter {
            role: parse_optional::<Role>(self.role, ROLE_FIELD)?,
            status: parse_optional::<AccountStatus>(self.status, STATUS_FIELD)?,
            search: self.search,
        })
    }
}

/// Response body for `GET /api/v1/admin/users`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

/// Query parameters for `DELETE /api/v1/admin/users`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct DeleteUserQuery {
    /// Identity id of the account to remove.
    pub user_id: Option<String>,
}

/// Response body for a removed account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserResponse {
    #[schema(example = "User deleted successfully")]
    pub message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub deleted_user_id: String,
}

/// Provision an identity and its profile in one request.
///
/// Runs identity creation, then profile creation; a profile failure removes
/// the identity again before the error is returned.
#[utoipa::path(
    post,
    path = "/api/v1/admin/create-user",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Account created", body = CreateUserResponse),
        (status = 400, description = "Missing or invalid field", body = Error),
        (status = 401, description = "No session", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 500, description = "Identity or profile creation failed", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createUser"
)]
#[post("/admin/create-user")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<web::Json<CreateUserResponse>> {
    let principal = session.user_id()?;
    // Authorisation precedes decoding and validation.
    require_role(state.access.as_ref(), principal.as_ref(), Role::Administrator).await?;
    let payload: CreateUserRequest = decode_json_body(&body)?;
    let request = AccountRequest::try_from(AccountRequestDraft::from(payload))
        .map_err(account_request_error)?;
    let user = state
        .provisioning
        .provision(principal.as_ref(), request)
        .await?;
    Ok(web::Json(CreateUserResponse {
        success: true,
        message: "User created successfully".to_owned(),
        user,
    }))
}

/// List clinic accounts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Matching profiles", body = UsersResponse),
        (status = 400, description = "Unknown role or status", body = Error),
        (status = 401, description = "No session", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<UsersResponse>> {
    let principal = session.user_id()?;
    require_role(state.access.as_ref(), principal.as_ref(), Role::Administrator).await?;
    let filter = query.into_inner().into_filter()?;
    let users = state
        .user_admin
        .list_users(principal.as_ref(), &filter)
        .await?;
    Ok(web::Json(UsersResponse { users }))
}

/// Remove an account: role details, profile, then identity.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users",
    params(DeleteUserQuery),
    responses(
        (status = 200, description = "Account removed", body = DeleteUserResponse),
        (status = 400, description = "Missing or invalid user id", body = Error),
        (status = 401, description = "No session", body = Error),
        (status = 403, description = "Not an administrator, or user not found", body = Error),
        (status = 500, description = "Delete failed", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DeleteUserQuery>,
) -> ApiResult<web::Json<DeleteUserResponse>> {
    let principal = session.user_id()?;
    require_role(state.access.as_ref(), principal.as_ref(), Role::Administrator).await?;
    let target = parse_user_id(query.into_inner().user_id, USER_ID_FIELD)?;
    let deleted = state
        .user_admin
        .delete_user(principal.as_ref(), &target)
        .await?;
    Ok(web::Json(DeleteUserResponse {
        message: "User deleted successfully".to_owned(),
        deleted_user_id: deleted.user_id.to_string(),
    }))
}

/// The caller's identity and profile side by side.
///
/// Troubleshooting aid; the payload shape is not part of the stable API.
#[utoipa::path(
    get,
    path = "/api/v1/admin/debug",
    responses(
        (status = 200, description = "Identity and profile of the caller", body = DebugSnapshot),
        (status = 401, description = "No session", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "debugSession"
)]
#[get("/admin/debug")]
pub async fn debug_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let principal = session.user_id()?;
    let snapshot = state.user_admin.debug_snapshot(principal.as_ref()).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
