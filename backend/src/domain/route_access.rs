//! Route authorisation table.
//!
//! An ordered, immutable list of application paths with the roles allowed to
//! open them. The front end asks the server which routes to render in its
//! navigation and whether a path may be visited; both answers come from the
//! one table declared here.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, Role};

/// How a [`RouteDefinition`] path is compared with a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The normalised paths must be equal.
    Exact,
    /// The path itself or anything below it (`path/...`).
    Prefix,
}

/// One entry of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteDefinition {
    #[schema(value_type = String, example = "Settings")]
    pub label: &'static str,
    #[schema(value_type = String, example = "/settings")]
    pub path: &'static str,
    #[schema(value_type = String, example = "settings")]
    pub icon: &'static str,
    #[schema(value_type = Vec<Role>)]
    pub allowed_roles: &'static [Role],
    pub show_in_nav: bool,
    pub match_kind: MatchKind,
}

impl RouteDefinition {
    /// Whether `role` may open this route.
    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    fn matches(&self, normalised: &str) -> bool {
        match self.match_kind {
            MatchKind::Exact => normalised == self.path,
            MatchKind::Prefix => normalised
                .strip_prefix(self.path)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

const ALL_ROLES: &[Role] = &Role::ALL;
const CLINICIANS_AND_ADMIN: &[Role] = &[Role::Administrator, Role::Dentist, Role::DentalStaff];
const ADMIN_ONLY: &[Role] = &[Role::Administrator];
const ADMIN_AND_DENTIST: &[Role] = &[Role::Administrator, Role::Dentist];

const fn route(
    label: &'static str,
    path: &'static str,
    icon: &'static str,
    allowed_roles: &'static [Role],
    match_kind: MatchKind,
) -> RouteDefinition {
    RouteDefinition {
        label,
        path,
        icon,
        allowed_roles,
        show_in_nav: true,
        match_kind,
    }
}

// First match wins. No entry shadows a later one; keep it that way when
// adding routes, listing a specific exact path before any broader prefix.
static CLINIC_ROUTES: [RouteDefinition; 9] = [
    route("Dashboard", "/dashboard", "layout-dashboard", ALL_ROLES, MatchKind::Exact),
    route(
        "Admin Appointments",
        "/appointments/admin",
        "calendar-cog",
        CLINICIANS_AND_ADMIN,
        MatchKind::Exact,
    ),
    route("Appointments", "/appointments", "calendar", ALL_ROLES, MatchKind::Exact),
    route("Patients", "/patients", "users", CLINICIANS_AND_ADMIN, MatchKind::Prefix),
    route("Staff", "/staff", "id-card", ADMIN_ONLY, MatchKind::Prefix),
    route("User Management", "/admin/users", "user-cog", ADMIN_ONLY, MatchKind::Prefix),
    route("Reports", "/reports", "bar-chart", ADMIN_AND_DENTIST, MatchKind::Prefix),
    RouteDefinition {
        show_in_nav: false,
        ..route("Profile", "/profile", "user", ALL_ROLES, MatchKind::Exact)
    },
    route("Settings", "/settings", "settings", ALL_ROLES, MatchKind::Prefix),
];

/// Strip trailing slashes, keeping the root path intact.
///
/// # Examples
/// ```
/// use clinic_backend::domain::normalize_path;
///
/// assert_eq!(normalize_path("/dashboard/"), "/dashboard");
/// assert_eq!(normalize_path("/"), "/");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Ordered route table. The first matching entry wins.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [RouteDefinition],
}

impl RouteTable {
    /// Wrap an ordered list of routes.
    pub const fn new(routes: &'static [RouteDefinition]) -> Self {
        Self { routes }
    }

    /// The clinic application's table.
    pub fn clinic() -> Self {
        Self::new(&CLINIC_ROUTES)
    }

    /// Every entry, in declaration order.
    pub fn routes(&self) -> &'static [RouteDefinition] {
        self.routes
    }

    /// Find the entry governing `path`.
    ///
    /// Returns [`crate::domain::ErrorCode::NotFound`] when nothing matches.
    pub fn resolve(&self, path: &str) -> Result<&'static RouteDefinition, Error> {
        let normalised = normalize_path(path);
        self.routes
            .iter()
            .find(|route| route.matches(normalised))
            .ok_or_else(|| Error::not_found(format!("no route registered for {normalised}")))
    }

    /// Whether `role` may open `path`. Unmapped paths are denied.
    pub fn authorize(&self, path: &str, role: Role) -> bool {
        self.resolve(path).is_ok_and(|route| route.allows(role))
    }

    /// Navigation entries for `role`, in declaration order.
    pub fn visible_routes(&self, role: Role) -> Vec<&'static RouteDefinition> {
        self.routes
            .iter()
            .filter(|route| route.show_in_nav && route.allows(role))
            .collect()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::clinic()
    }
}
