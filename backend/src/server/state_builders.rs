//! Builders wiring store adapters into the HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use clinic_backend::domain::ports::{
    IdentityStore, IdentityStoreError, ProfileStore, TracingProvisioningDiagnostics,
};
use clinic_backend::domain::{
    AccountStatus, EmailAddress, IdentityLoginService, ProfileCreation, ProfileRoleAccessPolicy,
    ProvisioningService, Role, UserAdminService,
};
use clinic_backend::inbound::http::state::{HttpState, HttpStatePorts};
use clinic_backend::outbound::memory::{InMemoryIdentityStore, InMemoryProfileStore};
use clinic_backend::outbound::supabase::{
    SupabaseClient, SupabaseIdentityStore, SupabaseProfileStore,
};
use clinic_backend::settings::SeedAdmin;

use super::config::StoreBackend;

type Stores = (Arc<dyn IdentityStore>, Arc<dyn ProfileStore>);

/// Wire the domain services over a pair of stores.
pub(super) fn build_http_state(
    identities: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
) -> HttpState {
    let access = Arc::new(ProfileRoleAccessPolicy::new(profiles.clone()));
    HttpState::new(HttpStatePorts {
        login: Arc::new(IdentityLoginService::new(identities.clone())),
        provisioning: Arc::new(ProvisioningService::new(
            identities.clone(),
            profiles.clone(),
            access.clone(),
            Arc::new(TracingProvisioningDiagnostics),
        )),
        user_admin: Arc::new(UserAdminService::new(identities, profiles, access.clone())),
        access,
    })
}

/// Construct the store adapters, seeding in-memory stores when selected.
pub(super) async fn build_stores(backend: StoreBackend) -> std::io::Result<Stores> {
    match backend {
        StoreBackend::Supabase(config) => {
            info!(url = %config.url, "using supabase stores");
            let client = SupabaseClient::new(&config).map_err(std::io::Error::other)?;
            let identities: Arc<dyn IdentityStore> =
                Arc::new(SupabaseIdentityStore::new(client.clone()));
            let profiles: Arc<dyn ProfileStore> = Arc::new(SupabaseProfileStore::new(client));
            Ok((identities, profiles))
        }
        StoreBackend::InMemory(seed) => {
            warn!("no supabase url configured; using in-memory stores");
            let identities: Arc<dyn IdentityStore> =
                Arc::new(InMemoryIdentityStore::new(Arc::new(DefaultClock)));
            let profiles: Arc<dyn ProfileStore> =
                Arc::new(InMemoryProfileStore::new(Arc::new(DefaultClock)));
            seed_admin(identities.as_ref(), profiles.as_ref(), &seed).await?;
            Ok((identities, profiles))
        }
    }
}

/// Create the development administrator. Skipped without a password.
async fn seed_admin(
    identities: &dyn IdentityStore,
    profiles: &dyn ProfileStore,
    seed: &SeedAdmin,
) -> std::io::Result<()> {
    let Some(password) = seed.password.as_ref() else {
        warn!("CLINIC_SEED_ADMIN_PASSWORD not set; no administrator seeded");
        return Ok(());
    };
    let email = EmailAddress::new(&seed.email).map_err(std::io::Error::other)?;
    let identity = match identities.create_identity(&email, password).await {
        Ok(identity) => identity,
        Err(IdentityStoreError::Rejected { message }) => {
            warn!(email = %email, %message, "seed administrator not created");
            return Ok(());
        }
        Err(error) => return Err(std::io::Error::other(error)),
    };

    let creation = ProfileCreation {
        user_id: identity.id.clone(),
        email,
        first_name: "Clinic".to_owned(),
        last_name: "Administrator".to_owned(),
        phone: None,
        gender: None,
        role: Role::Administrator,
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
    let outcome = profiles
        .create_profile(&creation)
        .await
        .map_err(std::io::Error::other)?;
    if !outcome.success {
        return Err(std::io::Error::other(format!(
            "seed administrator profile rejected: {}",
            outcome.error.unwrap_or_default()
        )));
    }
    info!(user_id = %identity.id, "seed administrator created");
    Ok(())
}
