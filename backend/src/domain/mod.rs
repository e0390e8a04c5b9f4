//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed domain entities and the use cases that
//! coordinate the identity and profile stores. Keep types immutable and
//! document invariants and serialisation contracts (serde) in each type's
//! Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - AccountRequest: validated input for account provisioning.
//! - ProvisioningService: identity-then-profile saga with compensation.
//! - UserAdminService: listing, deletion and the debug view.
//! - RouteTable: ordered path to role table for navigation and access.
//! - TraceId: request-scoped correlation identifier.

pub mod account_request;
pub mod auth;
pub mod error;
pub mod ports;
pub mod profile;
pub mod profile_access;
pub mod provisioning;
pub mod route_access;
pub mod trace_id;
pub mod user;
pub mod user_admin;

pub use self::account_request::{
    AccountRequest, AccountRequestDraft, AccountRequestError, RoleDetails, fields,
};
pub use self::auth::{IdentityLoginService, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile::{
    DebugSnapshot, DeletedUser, IdentityRecord, ProfileCreation, ProvisionedAccount, UserFilter,
    UserProfile,
};
pub use self::profile_access::ProfileRoleAccessPolicy;
pub use self::provisioning::{ProvisioningService, SagaPhase};
pub use self::route_access::{MatchKind, RouteDefinition, RouteTable, normalize_path};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{AccountStatus, EmailAddress, Gender, Role, UserId, UserValidationError};
pub use self::user_admin::UserAdminService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use clinic_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
