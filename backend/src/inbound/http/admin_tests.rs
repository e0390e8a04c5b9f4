//! Handler tests for the administrator endpoints over in-memory stores.

use super::*;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::ProfileStore;
use crate::domain::{UserFilter, UserId};
use crate::inbound::http::test_utils::{
    MemoryBackend, login_and_get_cookie, login_request, test_app,
};

const ADMIN_EMAIL: &str = "admin@clinic.example";
const ADMIN_PASSWORD: &str = "open-sesame";
const DENTIST_EMAIL: &str = "dr.molar@clinic.example";
const DENTIST_PASSWORD: &str = "floss-daily";

struct Clinic {
    backend: MemoryBackend,
    admin_id: UserId,
    dentist_id: UserId,
}

async fn clinic() -> Clinic {
    let backend = MemoryBackend::new();
    let admin_id = backend
        .seed(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Administrator)
        .await;
    let dentist_id = backend
        .seed(DENTIST_EMAIL, DENTIST_PASSWORD, Role::Dentist)
        .await;
    Clinic {
        backend,
        admin_id,
        dentist_id,
    }
}

fn dentist_payload(email: &str, license: &str) -> Value {
    json!({
        "email": email,
        "password": "temporary-1",
        "firstName": "Ivy",
        "lastName": "Incisor",
        "role": "dentist",
        "gender": "female",
        "specialization": "Orthodontics",
        "licenseNumber": license,
        "roomNumber": "3B"
    })
}

fn create_request(cookie: Option<Cookie<'static>>, payload: &Value) -> actix_test::TestRequest {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/admin/create-user")
        .set_json(payload);
    match cookie {
        Some(cookie) => request.cookie(cookie),
        None => request,
    }
}

async fn profile_count(backend: &MemoryBackend) -> usize {
    backend
        .profiles
        .list_profiles(&UserFilter::default())
        .await
        .expect("list profiles")
        .len()
}

#[actix_web::test]
async fn create_user_requires_a_session() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;

    let response = actix_test::call_service(
        &app,
        create_request(None, &dentist_payload("new@clinic.example", "DDS-9")).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(profile_count(&clinic.backend).await, 2);
}

#[actix_web::test]
async fn create_user_is_forbidden_for_non_administrators() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, DENTIST_EMAIL, DENTIST_PASSWORD).await;

    // Invalid payload: authorisation must still answer first.
    let response = actix_test::call_service(
        &app,
        create_request(Some(cookie), &json!({ "role": "dentist" })).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(profile_count(&clinic.backend).await, 2);
}

fn raw_create_request(
    cookie: Option<Cookie<'static>>,
    body: &'static str,
) -> actix_test::TestRequest {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/admin/create-user")
        .insert_header(("content-type", "application/json"))
        .set_payload(body);
    match cookie {
        Some(cookie) => request.cookie(cookie),
        None => request,
    }
}

#[actix_web::test]
async fn malformed_body_without_a_session_is_unauthorized() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;

    let response =
        actix_test::call_service(&app, raw_create_request(None, "{not json").to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert!(body["error"].is_string());
}

#[rstest]
#[case("{not json")]
#[case(r#"{"email": 42}"#)]
#[actix_web::test]
async fn malformed_body_from_an_administrator_is_a_json_bad_request(#[case] raw: &'static str) {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response =
        actix_test::call_service(&app, raw_create_request(Some(cookie), raw).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["error"], "request body must be a JSON object");
    assert_eq!(body["details"]["code"], "invalid_json");
    assert_eq!(profile_count(&clinic.backend).await, 2);
}

#[actix_web::test]
async fn malformed_login_body_uses_the_error_envelope() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_json");
}

#[actix_web::test]
async fn administrators_create_dentists() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        create_request(
            Some(cookie),
            &dentist_payload("Ivy.Incisor@Clinic.Example", "DDS-9"),
        )
        .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], "ivy.incisor@clinic.example");
    assert_eq!(body["user"]["role"], "dentist");
    assert_eq!(profile_count(&clinic.backend).await, 3);

    let login = actix_test::call_service(
        &app,
        login_request("ivy.incisor@clinic.example", "temporary-1").to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[rstest]
#[case("licenseNumber")]
#[case("specialization")]
#[case("roomNumber")]
#[actix_web::test]
async fn dentists_without_practice_details_are_rejected(#[case] dropped: &str) {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let mut payload = dentist_payload("new@clinic.example", "DDS-9");
    payload
        .as_object_mut()
        .expect("object payload")
        .remove(dropped);

    let response = actix_test::call_service(
        &app,
        create_request(Some(cookie), &payload).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], dropped);
    assert_eq!(body["details"]["code"], "missing_field");
    assert_eq!(profile_count(&clinic.backend).await, 2);
}

#[actix_web::test]
async fn duplicate_emails_fail_identity_creation() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        create_request(Some(cookie), &dentist_payload(DENTIST_EMAIL, "DDS-9")).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "identity_creation_failed");

    let original = actix_test::call_service(
        &app,
        login_request(DENTIST_EMAIL, DENTIST_PASSWORD).to_request(),
    )
    .await;
    assert_eq!(original.status(), StatusCode::OK);
}

#[actix_web::test]
async fn profile_rejection_removes_the_new_identity() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let first = actix_test::call_service(
        &app,
        create_request(
            Some(cookie.clone()),
            &dentist_payload("first@clinic.example", "DDS-9"),
        )
        .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let response = actix_test::call_service(
        &app,
        create_request(
            Some(cookie),
            &dentist_payload("second@clinic.example", "DDS-9"),
        )
        .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "profile_creation_failed");
    assert_eq!(
        body["error"],
        "profile creation failed: license number already registered"
    );
    let orphan_login = actix_test::call_service(
        &app,
        login_request("second@clinic.example", "temporary-1").to_request(),
    )
    .await;
    assert_eq!(orphan_login.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_users_filters_by_role_and_search() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/users?role=dentist&search=MOLAR")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let users = body["users"].as_array().expect("users array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], DENTIST_EMAIL);
    assert_eq!(users[0]["id"], clinic.dentist_id.to_string());

    let none = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/users?role=patient")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(none).await;
    assert_eq!(body, json!({ "users": [] }));
}

#[rstest]
#[case("role=janitor", "role")]
#[case("status=retired", "status")]
#[actix_web::test]
async fn list_users_rejects_unknown_filters(#[case] query: &str, #[case] field: &str) {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/admin/users?{query}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn list_users_is_forbidden_for_dentists() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, DENTIST_EMAIL, DENTIST_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case("/api/v1/admin/users", StatusCode::BAD_REQUEST)]
#[case("/api/v1/admin/users?userId=not-a-uuid", StatusCode::BAD_REQUEST)]
#[case(
    "/api/v1/admin/users?userId=3fa85f64-5717-4562-b3fc-2c963f66afa6",
    StatusCode::FORBIDDEN
)]
#[actix_web::test]
async fn delete_user_rejects_bad_targets(#[case] uri: &str, #[case] expected: StatusCode) {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn administrators_cannot_delete_themselves() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/users?userId={}", clinic.admin_id))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_user_removes_profile_and_identity() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/users?userId={}", clinic.dentist_id))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({
            "message": "User deleted successfully",
            "deletedUserId": clinic.dentist_id.to_string(),
        })
    );
    assert_eq!(profile_count(&clinic.backend).await, 1);
    let login = actix_test::call_service(
        &app,
        login_request(DENTIST_EMAIL, DENTIST_PASSWORD).to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn debug_shows_both_halves_of_the_caller() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;

    let anonymous = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/debug")
            .to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let cookie = login_and_get_cookie(&app, DENTIST_EMAIL, DENTIST_PASSWORD).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/debug")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["identity"]["email"], DENTIST_EMAIL);
    assert_eq!(body["profile"]["role"], "dentist");
}

#[rstest]
#[case("/api/v1/admin/users?role=bogus")]
#[case("/api/v1/admin/users?status=retired")]
#[actix_web::test]
async fn bad_filters_from_dentists_are_still_forbidden(#[case] uri: &str) {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, DENTIST_EMAIL, DENTIST_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn bad_delete_target_from_a_dentist_is_forbidden() {
    let clinic = clinic().await;
    let app = actix_test::init_service(test_app(clinic.backend.state())).await;
    let cookie = login_and_get_cookie(&app, DENTIST_EMAIL, DENTIST_PASSWORD).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/admin/users?userId=not-a-uuid")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
