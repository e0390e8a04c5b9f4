//! HTTP inbound adapter exposing REST endpoints.
//!
//! Everything except the health probes is mounted under `/api/v1` behind
//! the session middleware via [`api_services`].

use actix_web::web;

pub mod admin;
pub mod error;
pub mod health;
pub mod navigation;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register the session-backed API handlers on a scope.
///
/// Extractor failures are mapped onto the shared JSON error envelope.
pub fn api_services(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
        .service(users::login)
        .service(users::logout)
        .service(admin::create_user)
        .service(admin::list_users)
        .service(admin::delete_user)
        .service(admin::debug_session)
        .service(navigation::navigation)
        .service(navigation::check_access);
}
