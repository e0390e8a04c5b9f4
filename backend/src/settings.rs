//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CLINIC_*` environment variables and an
//! optional config file, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::outbound::supabase::SupabaseConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SEED_ADMIN_EMAIL: &str = "admin@clinic.local";

/// Server and backing-store settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLINIC")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Supabase project URL. Leave unset to run on in-memory stores.
    pub supabase_url: Option<String>,
    /// Service-role key for admin calls.
    pub supabase_service_key: Option<String>,
    /// Anonymous key for password sign-in.
    pub supabase_anon_key: Option<String>,
    /// Timeout for each outbound Supabase request.
    pub request_timeout_secs: Option<u64>,
    /// Administrator seeded into the in-memory stores.
    pub seed_admin_email: Option<String>,
    /// Password for the seeded administrator.
    pub seed_admin_password: Option<String>,
}

/// Reasons the loaded settings cannot be used.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {reason}")]
    InvalidBindAddr { value: String, reason: String },
    #[error("invalid supabase url '{value}': {reason}")]
    InvalidSupabaseUrl { value: String, reason: String },
    #[error("{name} is required when supabase_url is set")]
    MissingSupabaseKey { name: &'static str },
}

/// Administrator credentials for development mode.
#[derive(Debug)]
pub struct SeedAdmin {
    pub email: String,
    pub password: Option<Zeroizing<String>>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|error: std::net::AddrParseError| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            reason: error.to_string(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Supabase connection settings, or `None` for development mode.
    pub fn supabase(&self) -> Result<Option<SupabaseConfig>, SettingsError> {
        let Some(raw_url) = self.supabase_url.as_deref().filter(|url| !url.trim().is_empty())
        else {
            return Ok(None);
        };
        let url = Url::parse(raw_url.trim()).map_err(|error| SettingsError::InvalidSupabaseUrl {
            value: raw_url.to_owned(),
            reason: error.to_string(),
        })?;
        let service_key = required_key(&self.supabase_service_key, "supabase_service_key")?;
        let anon_key = required_key(&self.supabase_anon_key, "supabase_anon_key")?;
        Ok(Some(SupabaseConfig {
            url,
            service_key,
            anon_key,
            timeout: self.request_timeout(),
        }))
    }

    /// Seed administrator; no password means no seeding.
    pub fn seed_admin(&self) -> SeedAdmin {
        SeedAdmin {
            email: self
                .seed_admin_email
                .clone()
                .unwrap_or_else(|| DEFAULT_SEED_ADMIN_EMAIL.to_owned()),
            password: self
                .seed_admin_password
                .clone()
                .filter(|password| !password.is_empty())
                .map(Zeroizing::new),
        }
    }
}

fn required_key(
    value: &Option<String>,
    name: &'static str,
) -> Result<Zeroizing<String>, SettingsError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| Zeroizing::new(key.to_owned()))
        .ok_or(SettingsError::MissingSupabaseKey { name })
}
