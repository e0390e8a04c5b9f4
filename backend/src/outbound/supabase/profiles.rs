//! Profile store backed by the Supabase REST (PostgREST) API.

use async_trait::async_trait;
use reqwest::{Method, Url};

use super::dto::{CreateProfileRpcDto, ProfileRowDto};
use super::{ResponseFailure, SupabaseClient, classify_status};
use crate::domain::ports::{ProfileCreationOutcome, ProfileStore, ProfileStoreError};
use crate::domain::{ProfileCreation, Role, UserFilter, UserId, UserProfile};

const PROFILES_PATH: &str = "rest/v1/profiles";
const CREATE_PROFILE_RPC_PATH: &str = "rest/v1/rpc/create_user_with_profile";

/// Table holding the role-specific row, if the role has one.
fn details_table(role: Role) -> Option<&'static str> {
    match role {
        Role::Administrator => None,
        Role::Dentist => Some("doctors"),
        Role::DentalStaff => Some("staff"),
        Role::Patient => Some("patients"),
    }
}

/// Strip characters with meaning inside a PostgREST `or=(...)` filter and
/// escape `LIKE` wildcards so the term matches literally.
fn sanitise_search(term: &str) -> String {
    let mut sanitised = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            ',' | '(' | ')' | '*' | '\\' => {}
            '%' | '_' => {
                sanitised.push('\\');
                sanitised.push(c);
            }
            _ => sanitised.push(c),
        }
    }
    sanitised
}

fn apply_filter(url: &mut Url, filter: &UserFilter) {
    let mut query = url.query_pairs_mut();
    query.append_pair("select", "*");
    query.append_pair("order", "created_at.desc");
    if let Some(role) = filter.role {
        query.append_pair("role", &format!("eq.{role}"));
    }
    if let Some(status) = filter.status {
        query.append_pair("status", &format!("eq.{status}"));
    }
    let term = filter
        .search_term()
        .map(sanitise_search)
        .filter(|term| !term.is_empty());
    if let Some(term) = term {
        query.append_pair(
            "or",
            &format!(
                "(first_name.ilike.*{term}*,last_name.ilike.*{term}*,email.ilike.*{term}*)"
            ),
        );
    }
}

fn map_transport_error(error: reqwest::Error) -> ProfileStoreError {
    ProfileStoreError::connection(error.to_string())
}

fn map_failure(failure: ResponseFailure) -> ProfileStoreError {
    match failure {
        ResponseFailure::Unauthorised(message) => ProfileStoreError::denied(message),
        ResponseFailure::NotFound(message) | ResponseFailure::Rejected(message) => {
            ProfileStoreError::query(message)
        }
        ResponseFailure::Unavailable(message) => ProfileStoreError::connection(message),
    }
}

/// [`ProfileStore`] over `/rest/v1`.
#[derive(Clone)]
pub struct SupabaseProfileStore {
    client: SupabaseClient,
}

impl SupabaseProfileStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn url(&self, path: &str) -> Result<Url, ProfileStoreError> {
        self.client.endpoint(path).map_err(ProfileStoreError::query)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, ProfileStoreError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_failure(classify_status(status, body.as_ref())));
        }
        Ok(body.to_vec())
    }

    async fn select_profiles(&self, url: Url) -> Result<Vec<UserProfile>, ProfileStoreError> {
        let body = self.send(self.client.request(Method::GET, url)).await?;
        let rows: Vec<ProfileRowDto> = serde_json::from_slice(&body).map_err(|error| {
            ProfileStoreError::query(format!("invalid profile payload: {error}"))
        })?;
        rows.into_iter()
            .map(ProfileRowDto::into_domain)
            .collect::<Result<_, _>>()
            .map_err(ProfileStoreError::query)
    }

    async fn delete_where(
        &self,
        path: &str,
        column: &str,
        id: &UserId,
    ) -> Result<(), ProfileStoreError> {
        let mut url = self.url(path)?;
        url.query_pairs_mut()
            .append_pair(column, &format!("eq.{id}"));
        self.send(self.client.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for SupabaseProfileStore {
    async fn create_profile(
        &self,
        profile: &ProfileCreation,
    ) -> Result<ProfileCreationOutcome, ProfileStoreError> {
        let url = self.url(CREATE_PROFILE_RPC_PATH)?;
        let request = self
            .client
            .request(Method::POST, url)
            .json(&CreateProfileRpcDto::from(profile));
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|error| {
            ProfileStoreError::query(format!("invalid create_user_with_profile result: {error}"))
        })
    }

    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
        let mut url = self.url(PROFILES_PATH)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{id}"));
        Ok(self.select_profiles(url).await?.into_iter().next())
    }

    async fn list_profiles(
        &self,
        filter: &UserFilter,
    ) -> Result<Vec<UserProfile>, ProfileStoreError> {
        let mut url = self.url(PROFILES_PATH)?;
        apply_filter(&mut url, filter);
        self.select_profiles(url).await
    }

    async fn delete_role_details(&self, id: &UserId, role: Role) -> Result<(), ProfileStoreError> {
        match details_table(role) {
            Some(table) => {
                self.delete_where(&format!("rest/v1/{table}"), "user_id", id)
                    .await
            }
            None => Ok(()),
        }
    }

    async fn delete_profile(&self, id: &UserId) -> Result<(), ProfileStoreError> {
        self.delete_where(PROFILES_PATH, "id", id).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for query building and status mapping.
    use super::*;
    use crate::domain::AccountStatus;
    use reqwest::StatusCode;
    use rstest::rstest;

    fn query_of(filter: &UserFilter) -> Vec<(String, String)> {
        let mut url = Url::parse("https://abc.supabase.co/rest/v1/profiles").expect("url");
        apply_filter(&mut url, filter);
        url.query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    #[rstest]
    #[case(Role::Administrator, None)]
    #[case(Role::Dentist, Some("doctors"))]
    #[case(Role::DentalStaff, Some("staff"))]
    #[case(Role::Patient, Some("patients"))]
    fn details_table_follows_role(#[case] role: Role, #[case] expected: Option<&str>) {
        assert_eq!(details_table(role), expected);
    }

    #[rstest]
    fn filters_become_postgrest_operators() {
        let pairs = query_of(&UserFilter {
            role: Some(Role::DentalStaff),
            status: Some(AccountStatus::Suspended),
            search: Some(" mo(l)ar, ".to_owned()),
        });
        assert!(pairs.contains(&("role".to_owned(), "eq.dental_staff".to_owned())));
        assert!(pairs.contains(&("status".to_owned(), "eq.suspended".to_owned())));
        assert!(pairs.contains(&(
            "or".to_owned(),
            "(first_name.ilike.*molar*,last_name.ilike.*molar*,email.ilike.*molar*)".to_owned()
        )));
    }

    #[rstest]
    #[case("dr_molar", r"dr\_molar")]
    #[case("_", r"\_")]
    #[case("100%", r"100\%")]
    fn like_wildcards_match_literally(#[case] search: &str, #[case] escaped: &str) {
        let pairs = query_of(&UserFilter {
            search: Some(search.to_owned()),
            ..UserFilter::default()
        });
        let expected = format!(
            "(first_name.ilike.*{escaped}*,last_name.ilike.*{escaped}*,email.ilike.*{escaped}*)"
        );
        assert!(pairs.contains(&("or".to_owned(), expected)));
    }

    #[rstest]
    fn empty_filter_only_orders() {
        let pairs = query_of(&UserFilter::default());
        assert_eq!(
            pairs,
            [
                ("select".to_owned(), "*".to_owned()),
                ("order".to_owned(), "created_at.desc".to_owned()),
            ]
        );
    }

    #[rstest]
    fn search_made_only_of_operators_is_dropped() {
        let pairs = query_of(&UserFilter {
            search: Some("(*)".to_owned()),
            ..UserFilter::default()
        });
        assert!(pairs.iter().all(|(key, _)| key != "or"));
    }

    #[rstest]
    #[case(StatusCode::FORBIDDEN, "denied")]
    #[case(StatusCode::CONFLICT, "query")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, "connection")]
    fn statuses_map_to_store_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_failure(classify_status(status, br#"{"message":"nope"}"#));
        let actual = match error {
            ProfileStoreError::Denied { .. } => "denied",
            ProfileStoreError::Query { .. } => "query",
            ProfileStoreError::Connection { .. } => "connection",
        };
        assert_eq!(actual, expected);
    }
}
