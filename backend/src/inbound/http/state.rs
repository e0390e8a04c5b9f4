//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::RouteTable;
use crate::domain::ports::{AccessPolicy, AccountProvisioning, LoginService, UserAdministration};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub provisioning: Arc<dyn AccountProvisioning>,
    pub user_admin: Arc<dyn UserAdministration>,
    pub access: Arc<dyn AccessPolicy>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub provisioning: Arc<dyn AccountProvisioning>,
    pub user_admin: Arc<dyn UserAdministration>,
    pub access: Arc<dyn AccessPolicy>,
    pub routes: RouteTable,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state over the clinic route table.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_routes(ports, RouteTable::clinic())
    }

    /// Construct state with an explicit route table.
    pub fn with_routes(ports: HttpStatePorts, routes: RouteTable) -> Self {
        let HttpStatePorts {
            login,
            provisioning,
            user_admin,
            access,
        } = ports;
        Self {
            login,
            provisioning,
            user_admin,
            access,
            routes,
        }
    }
}
