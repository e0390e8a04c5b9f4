//! Route-visibility endpoints backed by the route authorisation table.
//!
//! ```text
//! GET /api/v1/navigation
//! GET /api/v1/access?path=/settings/practice
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Role, RouteDefinition, normalize_path};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

const PATH_FIELD: FieldName = FieldName::new("path");

/// Navigation entries for the caller's role.
#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationResponse {
    pub role: Role,
    #[schema(value_type = Vec<RouteDefinition>)]
    pub routes: Vec<&'static RouteDefinition>,
}

/// Query parameters for `GET /api/v1/access`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccessQuery {
    /// Application path to check, e.g. `/settings/practice`.
    pub path: Option<String>,
}

/// Access decision for one path.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccessResponse {
    /// The path after trailing slashes were removed.
    #[schema(example = "/settings/practice")]
    pub path: String,
    pub allowed: bool,
    /// The governing table entry; absent for unmapped paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<RouteDefinition>)]
    pub route: Option<&'static RouteDefinition>,
}

/// Routes to render in the caller's navigation, in table order.
#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    responses(
        (status = 200, description = "Visible routes", body = NavigationResponse),
        (status = 401, description = "No session", body = Error),
        (status = 403, description = "Caller has no profile", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["navigation"],
    operation_id = "navigation"
)]
#[get("/navigation")]
pub async fn navigation(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<NavigationResponse>> {
    let user_id = session.require_user_id()?;
    let role = state
        .access
        .role_of(&user_id)
        .await?
        .ok_or_else(|| Error::forbidden("no profile for this account"))?;
    Ok(web::Json(NavigationResponse {
        role,
        routes: state.routes.visible_routes(role),
    }))
}

/// Whether the caller may open `path`. Unmapped paths are denied.
#[utoipa::path(
    get,
    path = "/api/v1/access",
    params(AccessQuery),
    responses(
        (status = 200, description = "Access decision", body = AccessResponse),
        (status = 400, description = "Missing path", body = Error),
        (status = 401, description = "No session", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["navigation"],
    operation_id = "checkAccess"
)]
#[get("/access")]
pub async fn check_access(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AccessQuery>,
) -> ApiResult<web::Json<AccessResponse>> {
    let user_id = session.require_user_id()?;
    let path = query
        .into_inner()
        .path
        .filter(|path| !path.trim().is_empty())
        .ok_or_else(|| missing_field_error(PATH_FIELD))?;
    let path = normalize_path(path.trim());
    let role = state.access.role_of(&user_id).await?;
    let route = state.routes.resolve(path).ok();
    let allowed = role.is_some_and(|role| route.is_some_and(|route| route.allows(role)));

    Ok(web::Json(AccessResponse {
        path: path.to_owned(),
        allowed,
        route,
    }))
}

#[cfg(test)]
mod tests {
    //! Handler coverage for navigation and access checks.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{MemoryBackend, login_and_get_cookie, test_app};

    const PASSWORD: &str = "brush-twice";

    async fn get_as(role: Option<Role>, uri: &str) -> (StatusCode, Value) {
        let backend = MemoryBackend::new();
        let app = actix_test::init_service(test_app(backend.state())).await;
        let mut request = actix_test::TestRequest::get().uri(uri);
        if let Some(role) = role {
            let email = format!("{}@clinic.example", role.as_str());
            backend.seed(&email, PASSWORD, role).await;
            request = request.cookie(login_and_get_cookie(&app, &email, PASSWORD).await);
        }
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, value)
    }

    fn labels(value: &Value) -> Vec<&str> {
        value["routes"]
            .as_array()
            .expect("routes array")
            .iter()
            .filter_map(|route| route["label"].as_str())
            .collect()
    }

    #[actix_web::test]
    async fn patients_see_their_navigation_in_table_order() {
        let (status, body) = get_as(Some(Role::Patient), "/api/v1/navigation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "patient");
        assert_eq!(labels(&body), ["Dashboard", "Appointments", "Settings"]);
    }

    #[actix_web::test]
    async fn administrators_see_everything_but_hidden_routes() {
        let (_, body) = get_as(Some(Role::Administrator), "/api/v1/navigation").await;
        let labels = labels(&body);
        assert_eq!(labels.len(), 8);
        assert!(!labels.contains(&"Profile"));
        assert_eq!(body["routes"][0]["matchKind"], "exact");
        assert_eq!(body["routes"][0]["showInNav"], true);
    }

    #[actix_web::test]
    async fn navigation_requires_a_session() {
        let (status, _) = get_as(None, "/api/v1/navigation").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(Role::Patient, "/settings/practice", true, Some("Settings"))]
    #[case(Role::Dentist, "/settings/practice", true, Some("Settings"))]
    #[case(Role::Patient, "/appointments/admin", false, Some("Admin Appointments"))]
    #[case(Role::DentalStaff, "/appointments/admin/", true, Some("Admin Appointments"))]
    #[case(Role::Patient, "/appointments", true, Some("Appointments"))]
    #[case(Role::Patient, "/appointments/42", false, None)]
    #[case(Role::Administrator, "/billing", false, None)]
    #[actix_web::test]
    async fn access_follows_the_table(
        #[case] role: Role,
        #[case] path: &str,
        #[case] allowed: bool,
        #[case] label: Option<&str>,
    ) {
        let (status, body) = get_as(Some(role), &format!("/api/v1/access?path={path}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allowed"], allowed);
        assert_eq!(body["route"]["label"].as_str(), label);
    }

    #[rstest]
    #[case("/dashboard/")]
    #[case("/dashboard%20")]
    #[case("%20/dashboard/%20")]
    #[actix_web::test]
    async fn access_decides_on_the_path_it_reports(#[case] raw: &str) {
        let (status, body) =
            get_as(Some(Role::Patient), &format!("/api/v1/access?path={raw}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], "/dashboard");
        assert_eq!(body["allowed"], true);
        assert_eq!(body["route"]["label"], "Dashboard");
    }

    #[actix_web::test]
    async fn access_requires_a_path() {
        let (status, body) = get_as(Some(Role::Patient), "/api/v1/access").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "path");
    }
}
