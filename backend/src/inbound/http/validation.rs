//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` error whose details name the field
//! and a machine-readable code.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{Error, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidUserId,
    InvalidTimestamp,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidUserId => "invalid_user_id",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Error for a present but unusable value, using `message` verbatim.
pub(crate) fn invalid_value_error(field: FieldName, message: &str, value: &str) -> Error {
    ValidationError::new(field.as_str(), message).with_value(ErrorCode::InvalidValue, value)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_uuid_index_error(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must contain valid UUIDs")).with_index(
        ErrorCode::InvalidUuid,
        index,
        value,
    )
}

/// Require a non-blank value.
pub(crate) fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Parse a required user identifier.
pub(crate) fn parse_user_id(value: Option<String>, field: FieldName) -> Result<UserId, Error> {
    let raw = require(value, field)?;
    UserId::new(&raw).map_err(|err| {
        ValidationError::new(field.as_str(), format!("{}: {err}", field.as_str()))
            .with_value(ErrorCode::InvalidUserId, raw)
    })
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an RFC 3339 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| invalid_timestamp_error(field, &raw))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;
    use serde_json::Value;

    const USER_ID: FieldName = FieldName::new("userId");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case::absent(None)]
    #[case::blank(Some("   ".to_owned()))]
    fn missing_values_name_the_field(#[case] raw: Option<String>) {
        let error = parse_user_id(raw, USER_ID).expect_err("missing");
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(error.message(), "missing required field: userId");
        assert_eq!(detail(&error, "code"), Some(&Value::from("missing_field")));
    }

    #[rstest]
    fn malformed_user_ids_are_rejected() {
        let error = parse_user_id(Some("two words".into()), USER_ID).expect_err("invalid");
        assert_eq!(detail(&error, "code"), Some(&Value::from("invalid_user_id")));
    }

    #[rstest]
    fn uuid_list_errors_report_the_failing_index() {
        let error = invalid_uuid_index_error(FieldName::new("postIds"), 1, "nope");
        assert_eq!(detail(&error, "index"), Some(&Value::from(1)));
        assert_eq!(detail(&error, "code"), Some(&Value::from("invalid_uuid")));
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("2026-05-01T00:00:00Z".to_owned()), true)]
    #[case(Some("tomorrow".to_owned()), false)]
    fn timestamps_must_be_rfc3339(#[case] raw: Option<String>, #[case] ok: bool) {
        let parsed = parse_optional_rfc3339_timestamp(raw, FieldName::new("banEndsAt"));
        assert_eq!(parsed.is_ok(), ok);
    }
}
