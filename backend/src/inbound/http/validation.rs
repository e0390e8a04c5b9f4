//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `400 invalid_request` with details
//! `{ "field", "code" }`, plus `"value"` when echoing the input is useful.

use std::str::FromStr;

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::domain::{AccountRequestError, Error, UserId};

/// Validation error codes for query and path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    InvalidJson,
    InvalidQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::InvalidQuery => "invalid_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

fn value_error(field: FieldName, code: ErrorCode, value: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField.as_str(),
        format!("missing required field: {}", field.as_str()),
    )
}

/// Parse a required user id, treating blank input as missing.
pub(crate) fn parse_user_id(value: Option<String>, field: FieldName) -> Result<UserId, Error> {
    let raw = value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))?;
    UserId::new(raw.trim()).map_err(|_| {
        value_error(
            field,
            ErrorCode::InvalidUuid,
            &raw,
            format!("{} must be a valid UUID", field.as_str()),
        )
    })
}

/// Parse an optional enum-valued filter; blank input counts as absent.
pub(crate) fn parse_optional<T: FromStr>(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<T>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            raw.parse::<T>().map_err(|_| {
                value_error(
                    field,
                    ErrorCode::InvalidValue,
                    &raw,
                    format!("unsupported {}: {raw}", field.as_str()),
                )
            })
        })
        .transpose()
}

fn payload_error(code: ErrorCode, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code.as_str() }))
}

/// Decode a JSON request body. Parser messages are logged, not returned.
pub(crate) fn decode_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|error| {
        debug!(error = %error, "request body rejected");
        payload_error(ErrorCode::InvalidJson, "request body must be a JSON object")
    })
}

/// `JsonConfig` error handler producing the shared error envelope.
pub(crate) fn json_error_handler(
    error: JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    debug!(error = %error, "json extractor rejected request");
    payload_error(ErrorCode::InvalidJson, "request body must be a JSON object").into()
}

/// `QueryConfig` error handler producing the shared error envelope.
pub(crate) fn query_error_handler(
    error: QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    debug!(error = %error, "query extractor rejected request");
    payload_error(ErrorCode::InvalidQuery, "malformed query string").into()
}

/// Map a rejected account request to the shared error envelope.
pub(crate) fn account_request_error(error: AccountRequestError) -> Error {
    field_error(FieldName::new(error.field()), error.code(), error.to_string())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, Role};
    use rstest::rstest;

    const USER_ID: FieldName = FieldName::new("userId");
    const ROLE: FieldName = FieldName::new("role");

    #[rstest]
    #[case(None)]
    #[case(Some("  ".to_owned()))]
    fn blank_ids_are_missing(#[case] value: Option<String>) {
        let err = parse_user_id(value, USER_ID).expect_err("missing");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "userId", "code": "missing_field"}))
        );
    }

    #[rstest]
    fn malformed_ids_echo_the_value() {
        let err = parse_user_id(Some("nope".to_owned()), USER_ID).expect_err("invalid");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "userId", "value": "nope", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("dental-staff"), Some(Role::DentalStaff))]
    fn optional_roles_parse(#[case] raw: Option<&str>, #[case] expected: Option<Role>) {
        let parsed = parse_optional::<Role>(raw.map(str::to_owned), ROLE).expect("valid");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn unknown_roles_are_rejected() {
        let err = parse_optional::<Role>(Some("janitor".to_owned()), ROLE).expect_err("invalid");
        assert_eq!(err.message(), "unsupported role: janitor");
    }

    #[rstest]
    fn account_request_errors_keep_field_and_code() {
        let err = account_request_error(AccountRequestError::MissingField {
            field: crate::domain::fields::LICENSE_NUMBER,
        });
        assert_eq!(
            err.details(),
            Some(&json!({"field": "licenseNumber", "code": "missing_field"}))
        );
        assert_eq!(err.message(), "missing required field: licenseNumber");
    }
}
