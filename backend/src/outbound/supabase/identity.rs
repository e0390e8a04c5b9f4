//! Identity store backed by the Supabase auth admin API.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;

use super::dto::{AuthUserDto, CreateIdentityDto, PasswordGrantDto, TokenResponseDto};
use super::{ResponseFailure, SupabaseClient, classify_status};
use crate::domain::ports::{IdentityStore, IdentityStoreError};
use crate::domain::{EmailAddress, IdentityRecord, UserId};

const ADMIN_USERS_PATH: &str = "auth/v1/admin/users";
const TOKEN_PATH: &str = "auth/v1/token";

/// [`IdentityStore`] over `/auth/v1`.
#[derive(Clone)]
pub struct SupabaseIdentityStore {
    client: SupabaseClient,
}

impl SupabaseIdentityStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn user_url(&self, id: &UserId) -> Result<reqwest::Url, IdentityStoreError> {
        self.client
            .endpoint(&format!("{ADMIN_USERS_PATH}/{id}"))
            .map_err(IdentityStoreError::connection)
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityStoreError {
    IdentityStoreError::connection(error.to_string())
}

fn map_failure(failure: ResponseFailure, id: Option<&UserId>) -> IdentityStoreError {
    match failure {
        ResponseFailure::NotFound(message) => match id {
            Some(id) => IdentityStoreError::not_found(id.to_string()),
            None => IdentityStoreError::rejected(message),
        },
        ResponseFailure::Rejected(message) => IdentityStoreError::rejected(message),
        ResponseFailure::Unauthorised(message) | ResponseFailure::Unavailable(message) => {
            IdentityStoreError::connection(message)
        }
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    id: Option<&UserId>,
) -> Result<T, IdentityStoreError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_failure(classify_status(status, body.as_ref()), id));
    }
    serde_json::from_slice(body.as_ref())
        .map_err(|error| IdentityStoreError::decode(format!("invalid auth payload: {error}")))
}

#[async_trait]
impl IdentityStore for SupabaseIdentityStore {
    async fn create_identity(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<IdentityRecord, IdentityStoreError> {
        let url = self
            .client
            .endpoint(ADMIN_USERS_PATH)
            .map_err(IdentityStoreError::connection)?;
        let response = self
            .client
            .request(Method::POST, url)
            .json(&CreateIdentityDto {
                email: email.as_ref(),
                password,
                email_confirm: true,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let user: AuthUserDto = read_json(response, None).await?;
        user.into_domain().map_err(IdentityStoreError::decode)
    }

    async fn delete_identity(&self, id: &UserId) -> Result<(), IdentityStoreError> {
        let response = self
            .client
            .request(Method::DELETE, self.user_url(id)?)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_failure(classify_status(status, body.as_ref()), Some(id)))
    }

    async fn find_identity(
        &self,
        id: &UserId,
    ) -> Result<Option<IdentityRecord>, IdentityStoreError> {
        let response = self
            .client
            .request(Method::GET, self.user_url(id)?)
            .send()
            .await
            .map_err(map_transport_error)?;

        match read_json::<AuthUserDto>(response, Some(id)).await {
            Ok(user) => user.into_domain().map(Some).map_err(IdentityStoreError::decode),
            Err(IdentityStoreError::NotFound { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserId, IdentityStoreError> {
        let mut url = self
            .client
            .endpoint(TOKEN_PATH)
            .map_err(IdentityStoreError::connection)?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .client
            .anonymous_request(Method::POST, url)
            .json(&PasswordGrantDto { email, password })
            .send()
            .await
            .map_err(map_transport_error)?;

        match read_json::<TokenResponseDto>(response, None).await {
            Ok(token) => token
                .user
                .into_domain()
                .map(|record| record.id)
                .map_err(IdentityStoreError::decode),
            // The token endpoint answers 400 for unknown users and bad passwords alike.
            Err(IdentityStoreError::Rejected { .. }) => Err(IdentityStoreError::InvalidCredentials),
            Err(other) => Err(other),
        }
    }
}
