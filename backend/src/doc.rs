//! OpenAPI documentation for the REST API.
//!
//! Served by Swagger UI in debug builds and exported by the `openapi-dump`
//! binary for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AccountStatus, DebugSnapshot, Error, ErrorCode, Gender, IdentityRecord, MatchKind,
    ProvisionedAccount, Role, RouteDefinition, UserProfile,
};
use crate::inbound::http::admin::{
    CreateUserRequest, CreateUserResponse, DeleteUserResponse, UsersResponse,
};
use crate::inbound::http::navigation::{AccessResponse, NavigationResponse};
use crate::inbound::http::users::LoginRequest;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the clinic admin API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Dental clinic admin API",
        description = "Account provisioning, user administration and role-based navigation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::admin::create_user,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::debug_session,
        crate::inbound::http::navigation::navigation,
        crate::inbound::http::navigation::check_access,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        AccountStatus,
        Gender,
        IdentityRecord,
        UserProfile,
        ProvisionedAccount,
        DebugSnapshot,
        MatchKind,
        RouteDefinition,
        LoginRequest,
        CreateUserRequest,
        CreateUserResponse,
        UsersResponse,
        DeleteUserResponse,
        NavigationResponse,
        AccessResponse,
    )),
    tags(
        (name = "session", description = "Login and logout"),
        (name = "admin", description = "Administrator-only user management"),
        (name = "navigation", description = "Role-based route visibility"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
