//! Adapters for a hosted Supabase project.
//!
//! The auth admin API backs [`SupabaseIdentityStore`]; the PostgREST API
//! backs [`SupabaseProfileStore`]. Both share one [`SupabaseClient`], which
//! owns the base URL, keys and the reqwest client with its timeout.

mod dto;
mod identity;
mod profiles;

use std::fmt;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use zeroize::Zeroizing;

pub use identity::SupabaseIdentityStore;
pub use profiles::SupabaseProfileStore;

use dto::ErrorBodyDto;

/// Connection settings for a Supabase project.
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: Url,
    /// Service-role key used for admin calls.
    pub service_key: Zeroizing<String>,
    /// Anonymous key used for password sign-in.
    pub anon_key: Zeroizing<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Errors raised while building the shared client.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseClientError {
    #[error("supabase key is not a valid header value")]
    InvalidKey,
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Shared HTTP plumbing for the Supabase adapters.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base: Url,
    anon_key: HeaderValue,
    anon_bearer: HeaderValue,
}

impl SupabaseClient {
    /// Build a client that authenticates every request with the service key.
    ///
    /// # Errors
    ///
    /// Returns an error when a key is not a valid header value or the
    /// reqwest client cannot be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseClientError> {
        let service_key = sensitive_header(config.service_key.as_str())?;
        let bearer = sensitive_header(&format!("Bearer {}", config.service_key.as_str()))?;
        let anon_key = sensitive_header(config.anon_key.as_str())?;
        let anon_bearer = sensitive_header(&format!("Bearer {}", config.anon_key.as_str()))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", service_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base: ensure_trailing_slash(config.url.clone()),
            anon_key,
            anon_bearer,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, String> {
        self.base
            .join(path)
            .map_err(|error| format!("invalid endpoint {path}: {error}"))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Request authenticated with the anonymous key instead of the service key.
    fn anonymous_request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.clone())
            .header(AUTHORIZATION, self.anon_bearer.clone())
    }
}

fn sensitive_header(raw: &str) -> Result<HeaderValue, SupabaseClientError> {
    let mut value = HeaderValue::from_str(raw).map_err(|_| SupabaseClientError::InvalidKey)?;
    value.set_sensitive(true);
    Ok(value)
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Failure classes shared by both adapters before they map into port errors.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResponseFailure {
    Unauthorised(String),
    NotFound(String),
    Rejected(String),
    Unavailable(String),
}

fn classify_status(status: StatusCode, body: &[u8]) -> ResponseFailure {
    let detail = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::message)
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), detail)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ResponseFailure::Unauthorised(message),
        StatusCode::NOT_FOUND => ResponseFailure::NotFound(message),
        _ if status.is_client_error() => ResponseFailure::Rejected(detail_or(message, &detail)),
        _ => ResponseFailure::Unavailable(message),
    }
}

/// Client errors carry the store's own wording, which callers surface as-is.
fn detail_or(message: String, detail: &str) -> String {
    if detail.is_empty() {
        message
    } else {
        detail.to_owned()
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
