//! Dental clinic admin backend.
//!
//! Hexagonal layout: [`domain`] holds the provisioning saga, user
//! administration and the route authorisation table behind ports;
//! [`inbound`] exposes them over HTTP; [`outbound`] implements the ports
//! against Supabase or in-memory stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
