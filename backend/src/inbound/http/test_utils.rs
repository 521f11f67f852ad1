//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use crate::domain::ports::{
    MockBanRegistry, MockFeedQuery, MockHashtagCatalogue, MockPlaylistManagement,
    MockPostIngestion, MockUserAccounts, MockVideoLibrary,
};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mocks for every driving port, each defaulting to no expectations.
#[derive(Default)]
pub struct MockPorts {
    pub feed: MockFeedQuery,
    pub bans: MockBanRegistry,
    pub users: MockUserAccounts,
    pub playlists: MockPlaylistManagement,
    pub hashtags: MockHashtagCatalogue,
    pub ingestion: MockPostIngestion,
    pub videos: MockVideoLibrary,
}

impl MockPorts {
    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            feed: Arc::new(self.feed),
            bans: Arc::new(self.bans),
            users: Arc::new(self.users),
            playlists: Arc::new(self.playlists),
            hashtags: Arc::new(self.hashtags),
            ingestion: Arc::new(self.ingestion),
            videos: Arc::new(self.videos),
        })
    }
}

/// Serve one request against handlers registered by `routes` under `/api`.
pub async fn call(
    ports: MockPorts,
    routes: fn(&mut web::ServiceConfig),
    request: actix_test::TestRequest,
) -> ServiceResponse {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(web::scope("/api").configure(routes)),
    )
    .await;
    actix_test::call_service(&app, request.to_request()).await
}

/// Read a response body as JSON.
pub async fn json_body(response: ServiceResponse) -> Value {
    let bytes = actix_test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("response JSON")
}
