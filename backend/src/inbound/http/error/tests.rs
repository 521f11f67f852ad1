//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("unauthorized"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::unprocessable("user ids invalid"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::service_unavailable("later"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn response_payload(error: &Error) -> (StatusCode, Option<String>, Error) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let payload = serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds");
    (status, header, payload)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_drop_details_but_keep_message(expected_trace_id: String) {
    let error = Error::internal("Failed to get posts")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "secret": "connection string" }));

    let (status, header, payload) = response_payload(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(payload.message(), "Failed to get posts");
    assert!(payload.details().is_none());
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_details(expected_trace_id: String) {
    let error = Error::invalid_request("missing required field: userId")
        .with_trace_id(expected_trace_id)
        .with_details(json!({ "field": "userId" }));

    let (status, _, payload) = response_payload(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload.details(), Some(&json!({ "field": "userId" })));
}

#[rstest]
#[actix_web::test]
async fn errors_without_trace_id_omit_header() {
    let (_, header, _) = response_payload(&Error::not_found("playlist not found")).await;
    assert!(header.is_none());
}
