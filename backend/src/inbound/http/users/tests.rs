//! Tests for user handlers.

use super::*;
use crate::domain::{Role, UserId};
use crate::inbound::http::test_utils::{MockPorts, call, json_body};
use crate::test_support::fixtures::epoch;
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(get_user)
        .service(update_user)
        .service(get_preferences)
        .service(update_preferences);
}

fn user(id: &str) -> User {
    User::register(UserId::new(id).expect("user id"), epoch())
}

fn travel() -> Hashtag {
    Hashtag {
        id: HashtagId::generate(),
        name: "travel".into(),
        post_count: 3,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

#[rstest]
#[actix_web::test]
async fn create_user_returns_created_user() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_create_user()
        .withf(|id| id.as_ref() == "U1")
        .returning(|id| Ok(User::register(id, epoch())));

    let response = call(
        ports,
        routes,
        TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "userId": "U1" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["message"], json!("User created successfully"));
    assert_eq!(body["user"]["userId"], json!("U1"));
    assert_eq!(
        body["user"]["accounts"],
        json!([{ "name": "youtube", "isSynced": false }])
    );
    assert_eq!(body["user"]["accessToken"], Value::Null);
    assert_eq!(body["user"]["roles"], json!(["user"]));
}

#[rstest]
#[case::absent(json!({}))]
#[case::blank(json!({ "userId": "  " }))]
#[actix_web::test]
async fn create_user_requires_user_id(#[case] payload: Value) {
    let response = call(
        MockPorts::default(),
        routes,
        TestRequest::post().uri("/api/user").set_json(payload),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn duplicate_user_is_conflict() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_create_user()
        .returning(|_| Err(Error::conflict("User with the provided ID already exists")));

    let response = call(
        ports,
        routes,
        TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "userId": "U1" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let response = call(
        MockPorts::default(),
        routes,
        TestRequest::post()
            .uri("/api/user")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], json!("invalid_request"));
}

#[rstest]
#[actix_web::test]
async fn get_user_dereferences_preferences() {
    let tag = travel();
    let tag_id = tag.id;
    let mut ports = MockPorts::default();
    ports.users.expect_get_user().returning(move |id| {
        let mut found = User::register(id.clone(), epoch());
        found.roles.push(Role::Admin);
        Ok(UserProfile {
            user: found,
            preferences: vec![tag.clone()],
        })
    });

    let response = call(ports, routes, TestRequest::get().uri("/api/users/U1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["preferences"],
        json!([{ "id": tag_id.to_string(), "name": "travel" }])
    );
    assert_eq!(body["roles"], json!(["user", "admin"]));
}

#[rstest]
#[actix_web::test]
async fn get_unknown_user_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_get_user()
        .returning(|_| Err(Error::not_found("User not found")));

    let response = call(ports, routes, TestRequest::get().uri("/api/users/U404")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn update_user_forwards_accounts_and_token_clear() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_update_user()
        .withf(|request| {
            request.accounts
                == Some(vec![AccountUpdate {
                    name: AccountName::Vimeo,
                    is_synced: Some(true),
                }])
                && request.access_token == Some(None)
        })
        .returning(|request| {
            Ok(UserProfile {
                user: User::register(request.user_id, epoch()),
                preferences: Vec::new(),
            })
        });

    let response = call(
        ports,
        routes,
        TestRequest::patch().uri("/api/users/U1").set_json(json!({
            "accounts": [{ "name": "vimeo", "isSynced": true }],
            "accessToken": null
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn update_user_without_token_leaves_it_untouched() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_update_user()
        .withf(|request| request.access_token.is_none() && request.accounts.is_none())
        .returning(|request| {
            Ok(UserProfile {
                user: User::register(request.user_id, epoch()),
                preferences: Vec::new(),
            })
        });

    let response = call(
        ports,
        routes,
        TestRequest::patch().uri("/api/users/U1").set_json(json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case::not_object(json!(["youtube"]), "Each item in accounts should be an object")]
#[case::no_name(json!([{ "isSynced": true }]), "Account name should be a string and is required")]
#[case::name_not_string(json!([{ "name": 3 }]), "Account name should be a string and is required")]
#[case::duplicate(
    json!([{ "name": "youtube" }, { "name": "youtube" }]),
    "Account name \"youtube\" should be unique"
)]
#[case::flag_not_bool(json!([{ "name": "vimeo", "isSynced": "yes" }]), "Account isSynced should be a boolean")]
#[case::not_allowed(
    json!([{ "name": "tiktok" }]),
    "Account name \"tiktok\" is not allowed. Only \"youtube\" and \"vimeo\" are accepted."
)]
#[actix_web::test]
async fn invalid_accounts_are_rejected(#[case] accounts: Value, #[case] message: &str) {
    let response = call(
        MockPorts::default(),
        routes,
        TestRequest::patch()
            .uri("/api/users/U1")
            .set_json(json!({ "accounts": accounts })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], json!(message));
}

#[rstest]
#[actix_web::test]
async fn preferences_are_listed() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_preferences()
        .returning(|_| Ok(vec![travel()]));

    let response = call(
        ports,
        routes,
        TestRequest::get().uri("/api/users/U1/preferences"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body[0]["name"], json!("travel"));
}

#[rstest]
#[actix_web::test]
async fn preference_update_requires_list() {
    let response = call(
        MockPorts::default(),
        routes,
        TestRequest::patch()
            .uri("/api/users/U1/preferences")
            .set_json(json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn preference_update_passes_raw_ids() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_update_preferences()
        .withf(|id, raw| {
            id.as_ref() == "U1" && raw.to_vec() == vec!["a".to_owned(), "b".to_owned()]
        })
        .returning(|id, _| {
            Ok(UserProfile {
                user: User::register(id.clone(), epoch()),
                preferences: Vec::new(),
            })
        });

    let response = call(
        ports,
        routes,
        TestRequest::patch()
            .uri("/api/users/U1/preferences")
            .set_json(json!({ "preferences": ["a", "b"] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}
