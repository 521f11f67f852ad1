//! Tests for error construction, trace capture and serialisation.

use super::*;
use crate::domain::TraceId;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::unauthorized(Error::unauthorized("no"), ErrorCode::Unauthorized)]
#[case::not_found(Error::not_found("gone"), ErrorCode::NotFound)]
#[case::conflict(Error::conflict("dupe"), ErrorCode::Conflict)]
#[case::unprocessable(Error::unprocessable("not admin"), ErrorCode::UnprocessableEntity)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_replaces_blank_messages() {
    let error = Error::new(ErrorCode::InternalError, "");
    assert_eq!(error.message(), "Unexpected error");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("  ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_payload(expected_trace_id: String) {
    let error = Error::unprocessable("unauthorised")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "bannedBy" }));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "unprocessable_entity",
            "message": "unauthorised",
            "traceId": expected_trace_id,
            "details": { "field": "bannedBy" },
        })
    );
}

#[rstest]
fn deserialising_rejects_blank_message() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "code": "not_found", "message": " " }));
    assert!(result.is_err());
}

#[rstest]
fn without_details_drops_payload() {
    let error = Error::internal("boom").with_details(json!({ "secret": "x" }));
    assert!(error.without_details().details().is_none());
}
