//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use mockable::DefaultClock;
use serde_json::json;

use super::api_services;
use super::state::{HttpState, HttpStatePorts};
use crate::domain::ports::{IdentityStore, ProfileStore, TracingProvisioningDiagnostics};
use crate::domain::{
    AccountStatus, EmailAddress, IdentityLoginService, ProfileCreation, ProfileRoleAccessPolicy,
    ProvisioningService, Role, UserAdminService, UserId,
};
use crate::outbound::memory::{InMemoryIdentityStore, InMemoryProfileStore};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `/api/v1` scope as mounted by the server, over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .configure(api_services),
    )
}

/// `POST /api/v1/login` with the given credentials.
pub fn login_request(email: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": password }))
}

/// Log in through the API and return the session cookie.
pub async fn login_and_get_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let response = actix_test::call_service(app, login_request(email, password).to_request()).await;
    assert_eq!(response.status(), StatusCode::OK, "login for {email} failed");
    session_cookie(&response)
}

/// Pull the session cookie out of a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Real services over in-memory stores, as wired in the server.
pub struct MemoryBackend {
    pub identities: Arc<InMemoryIdentityStore>,
    pub profiles: Arc<InMemoryProfileStore>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            identities: Arc::new(InMemoryIdentityStore::new(Arc::new(DefaultClock))),
            profiles: Arc::new(InMemoryProfileStore::new(Arc::new(DefaultClock))),
        }
    }

    /// Create an account directly in the stores, bypassing authorisation.
    pub async fn seed(&self, email: &str, password: &str, role: Role) -> UserId {
        let email = EmailAddress::new(email).expect("fixture email");
        let identity = self
            .identities
            .create_identity(&email, password)
            .await
            .expect("seed identity");
        let creation = ProfileCreation {
            user_id: identity.id.clone(),
            email,
            first_name: "Seed".to_owned(),
            last_name: role.as_str().to_owned(),
            phone: None,
            gender: None,
            role,
            status: AccountStatus::Active,
            specialization: None,
            license_number: None,
            room_number: None,
            position: None,
            supervising_dentist_id: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_number: None,
        };
        let outcome = self
            .profiles
            .create_profile(&creation)
            .await
            .expect("seed profile");
        assert!(outcome.success, "seed profile rejected: {:?}", outcome.error);
        identity.id
    }

    pub fn state(&self) -> HttpState {
        let access = Arc::new(ProfileRoleAccessPolicy::new(self.profiles.clone()));
        HttpState::new(HttpStatePorts {
            login: Arc::new(IdentityLoginService::new(self.identities.clone())),
            provisioning: Arc::new(ProvisioningService::new(
                self.identities.clone(),
                self.profiles.clone(),
                access.clone(),
                Arc::new(TracingProvisioningDiagnostics),
            )),
            user_admin: Arc::new(UserAdminService::new(
                self.identities.clone(),
                self.profiles.clone(),
                access.clone(),
            )),
            access,
        })
    }
}
