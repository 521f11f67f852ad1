//! Tests for feed, suggestion and ingestion handlers.

use super::*;
use crate::domain::Error;
use crate::domain::ingestion::IngestionReport;
use crate::inbound::http::test_utils::{MockPorts, call, json_body};
use crate::test_support::fixtures::post;
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::Value;

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_posts)
        .service(create_posts)
        .service(get_suggestions);
}

fn page(posts: Vec<Post>) -> FeedPage {
    FeedPage {
        total_posts: 12,
        total_pages: 2,
        current_page: 2,
        posts,
    }
}

#[rstest]
#[actix_web::test]
async fn feed_parses_loose_query_parameters() {
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_feed()
        .withf(|request| {
            request.page == 2
                && request.limit == 100
                && request.user_id.as_deref() == Some("U1")
                && request.hashtag.as_deref() == Some("travel")
                && request.moment.as_deref() == Some("true")
                && request.sort == FeedSort::MostLiked
                && request.related_of.is_none()
        })
        .returning(|_| Ok(page(vec![post("h1", "P1", 0)])));

    let response = call(
        ports,
        routes,
        TestRequest::get().uri(
            "/api/posts?page=2&limit=500&userId=U1&hashtag=travel&moment=true&sort_by=most_liked&related_of=",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["totalPosts"], Value::from(12));
    assert_eq!(body["currentPage"], Value::from(2));
    assert_eq!(body["posts"][0]["postHash"], Value::from("h1"));
}

#[rstest]
#[actix_web::test]
async fn feed_defaults_apply_without_parameters() {
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_feed()
        .withf(|request| {
            request.page == 1
                && request.limit == FEED_FALLBACK_LIMIT
                && request.user_id.is_none()
                && request.sort == FeedSort::Latest
        })
        .returning(|_| Ok(page(Vec::new())));

    let response = call(ports, routes, TestRequest::get().uri("/api/posts?page=zero")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn feed_store_failure_is_500_with_public_message() {
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_feed()
        .returning(|_| Err(Error::internal("Failed to get posts")));

    let response = call(ports, routes, TestRequest::get().uri("/api/posts")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["message"], Value::from("Failed to get posts"));
}

#[rstest]
#[case::created(2, "2 new posts have been created.")]
#[case::nothing(0, "No new videos found to create screenshots.")]
#[actix_web::test]
async fn ingestion_trigger_reports_created_posts(#[case] created: usize, #[case] message: &str) {
    let mut ports = MockPorts::default();
    ports.ingestion.expect_ingest().returning(move || {
        Ok(IngestionReport {
            created: (0..created)
                .map(|index| post(&format!("h{index}"), "P1", 0))
                .collect(),
            ..IngestionReport::default()
        })
    });

    let response = call(ports, routes, TestRequest::post().uri("/api/posts")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["message"], Value::from(message));
    assert_eq!(body.get("results").is_some(), created > 0);
}

#[rstest]
#[actix_web::test]
async fn overlapping_ingestion_is_conflict() {
    let mut ports = MockPorts::default();
    ports
        .ingestion
        .expect_ingest()
        .returning(|| Err(Error::conflict("ingestion is already running")));

    let response = call(ports, routes, TestRequest::post().uri("/api/posts")).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn suggestions_wrap_related_posts() {
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_suggestions()
        .withf(|title| title == "sunset beach")
        .returning(|_| Ok(vec![post("h1", "P1", 0)]));

    let response = call(
        ports,
        routes,
        TestRequest::post().uri("/api/suggestions?title=sunset%20beach"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["relatedPosts"].as_array().map(Vec::len), Some(1));
}
