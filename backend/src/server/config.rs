//! HTTP server configuration object.

use std::net::SocketAddr;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use clinic_backend::inbound::http::session_config::SessionSettings;
use clinic_backend::outbound::supabase::SupabaseConfig;
use clinic_backend::settings::SeedAdmin;

/// Where identities and profiles live.
pub enum StoreBackend {
    /// Hosted Supabase project.
    Supabase(SupabaseConfig),
    /// Process-local stores, seeded with one administrator.
    InMemory(SeedAdmin),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) stores: StoreBackend,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, stores: StoreBackend) -> Self {
        Self {
            session,
            bind_addr,
            stores,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
