//! In-memory identity and profile stores.
//!
//! Used when no hosted store is configured and by integration tests. The
//! stores enforce the same constraints the hosted ones report: unique email
//! per identity, one profile per identity, unique dentist licence numbers,
//! supervisors must be dentists, and detail rows must go before their
//! profile.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;
use zeroize::Zeroizing;

use crate::domain::ports::{
    IdentityStore, IdentityStoreError, ProfileCreationOutcome, ProfileStore, ProfileStoreError,
};
use crate::domain::{
    EmailAddress, IdentityRecord, ProfileCreation, Role, UserFilter, UserId, UserProfile,
};

struct StoredIdentity {
    record: IdentityRecord,
    password: Zeroizing<String>,
}

/// [`IdentityStore`] held in process memory.
pub struct InMemoryIdentityStore {
    identities: Mutex<HashMap<UserId, StoredIdentity>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryIdentityStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            identities: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, StoredIdentity>>, IdentityStoreError> {
        self.identities
            .lock()
            .map_err(|_| IdentityStoreError::connection("identity map lock poisoned"))
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn create_identity(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<IdentityRecord, IdentityStoreError> {
        if password.chars().count() < 6 {
            return Err(IdentityStoreError::rejected(
                "Password should be at least 6 characters",
            ));
        }
        let mut identities = self.lock()?;
        if identities
            .values()
            .any(|stored| stored.record.email == email.as_ref())
        {
            return Err(IdentityStoreError::rejected(
                "A user with this email address has already been registered",
            ));
        }

        let record = IdentityRecord {
            id: UserId::random(),
            email: email.to_string(),
            confirmed: true,
            created_at: Some(self.clock.utc()),
        };
        identities.insert(
            record.id.clone(),
            StoredIdentity {
                record: record.clone(),
                password: Zeroizing::new(password.to_owned()),
            },
        );
        Ok(record)
    }

    async fn delete_identity(&self, id: &UserId) -> Result<(), IdentityStoreError> {
        self.lock()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| IdentityStoreError::not_found(id.to_string()))
    }

    async fn find_identity(
        &self,
        id: &UserId,
    ) -> Result<Option<IdentityRecord>, IdentityStoreError> {
        Ok(self.lock()?.get(id).map(|stored| stored.record.clone()))
    }

    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserId, IdentityStoreError> {
        let email = email.trim().to_lowercase();
        self.lock()?
            .values()
            .find(|stored| stored.record.email == email && stored.password.as_str() == password)
            .map(|stored| stored.record.id.clone())
            .ok_or(IdentityStoreError::InvalidCredentials)
    }
}

#[derive(Default)]
struct ProfileRows {
    // Insertion order; listing reverses it so the newest comes first.
    profiles: Vec<UserProfile>,
    details: HashMap<UserId, ProfileCreation>,
}

impl ProfileRows {
    fn rejection(&self, creation: &ProfileCreation) -> Option<&'static str> {
        if self.profiles.iter().any(|p| p.id == creation.user_id) {
            return Some("profile already exists for this user");
        }
        if self
            .profiles
            .iter()
            .any(|p| p.email == creation.email.as_ref())
        {
            return Some("email already has a profile");
        }
        let licence_taken = creation.license_number.as_deref().is_some_and(|license| {
            self.details
                .values()
                .any(|row| row.license_number.as_deref() == Some(license))
        });
        if licence_taken {
            return Some("license number already registered");
        }
        let supervisor_missing = creation
            .supervising_dentist_id
            .as_ref()
            .is_some_and(|supervisor| {
                !self
                    .profiles
                    .iter()
                    .any(|p| p.id == *supervisor && p.role == Role::Dentist)
            });
        if supervisor_missing {
            return Some("supervising dentist not found");
        }
        None
    }
}

/// [`ProfileStore`] held in process memory.
pub struct InMemoryProfileStore {
    rows: Mutex<ProfileRows>,
    clock: Arc<dyn Clock>,
}

impl InMemoryProfileStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Mutex::new(ProfileRows::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ProfileRows>, ProfileStoreError> {
        self.rows
            .lock()
            .map_err(|_| ProfileStoreError::connection("profile rows lock poisoned"))
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn create_profile(
        &self,
        creation: &ProfileCreation,
    ) -> Result<ProfileCreationOutcome, ProfileStoreError> {
        let mut rows = self.lock()?;
        if let Some(reason) = rows.rejection(creation) {
            return Ok(ProfileCreationOutcome::failed(reason));
        }

        rows.profiles.push(UserProfile {
            id: creation.user_id.clone(),
            email: creation.email.to_string(),
            first_name: creation.first_name.clone(),
            last_name: creation.last_name.clone(),
            phone: creation.phone.clone(),
            gender: creation.gender,
            role: creation.role,
            status: creation.status,
            created_at: Some(self.clock.utc()),
        });
        if creation.role != Role::Administrator {
            rows.details
                .insert(creation.user_id.clone(), creation.clone());
        }
        Ok(ProfileCreationOutcome::succeeded())
    }

    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
        Ok(self.lock()?.profiles.iter().find(|p| p.id == *id).cloned())
    }

    async fn list_profiles(
        &self,
        filter: &UserFilter,
    ) -> Result<Vec<UserProfile>, ProfileStoreError> {
        Ok(self
            .lock()?
            .profiles
            .iter()
            .rev()
            .filter(|profile| filter.matches(profile))
            .cloned()
            .collect())
    }

    async fn delete_role_details(&self, id: &UserId, role: Role) -> Result<(), ProfileStoreError> {
        if role == Role::Administrator {
            return Ok(());
        }
        let mut rows = self.lock()?;
        if rows.details.get(id).is_some_and(|row| row.role == role) {
            rows.details.remove(id);
        }
        Ok(())
    }

    async fn delete_profile(&self, id: &UserId) -> Result<(), ProfileStoreError> {
        let mut rows = self.lock()?;
        if rows.details.contains_key(id) {
            return Err(ProfileStoreError::query(format!(
                "role details still reference profile {id}"
            )));
        }
        rows.profiles.retain(|profile| profile.id != *id);
        Ok(())
    }
}
