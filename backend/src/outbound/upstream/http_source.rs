//! Reqwest-backed upstream post source.
//!
//! Requests are retried once when the peer resets the connection; every other
//! failure is mapped straight into [`PostSourceError`].

use std::error::Error as StdError;
use std::future::Future;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::dto::{FetchRequestDto, PostsFoundDto};
use crate::domain::ports::{PostCandidate, PostSource, PostSourceError};

/// Upstream adapter posting fetch requests to one endpoint.
pub struct HttpPostSource {
    client: Client,
    endpoint: Url,
}

impl HttpPostSource {
    /// Build an adapter whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    async fn post_once(&self, count: u32) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&FetchRequestDto {
                num_to_fetch: count,
            })
            .send()
            .await
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch_candidates(&self, count: u32) -> Result<Vec<PostCandidate>, PostSourceError> {
        let response = send_with_reset_retry(
            || self.post_once(count),
            is_connection_reset,
            map_transport_error,
        )
        .await?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let candidates = parse_candidates(body.as_ref())?;
        debug!(count = candidates.len(), "upstream candidates decoded");
        Ok(candidates)
    }
}

fn parse_candidates(body: &[u8]) -> Result<Vec<PostCandidate>, PostSourceError> {
    let decoded: PostsFoundDto = serde_json::from_slice(body)
        .map_err(|error| PostSourceError::decode(format!("invalid upstream payload: {error}")))?;
    Ok(decoded.into_candidates())
}

/// Run `send`, repeating it once when the first failure is a reset.
///
/// A second failure of any kind is mapped through `into_error`.
async fn send_with_reset_retry<T, E, F, Fut>(
    mut send: F,
    is_reset: fn(&E) -> bool,
    into_error: fn(E) -> PostSourceError,
) -> Result<T, PostSourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match send().await {
        Err(error) if is_reset(&error) => {
            warn!("upstream reset the connection; retrying once");
            send().await.map_err(into_error)
        }
        other => other.map_err(into_error),
    }
}

fn is_connection_reset(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = error.source();
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            if io_error.kind() == io::ErrorKind::ConnectionReset {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

fn map_transport_error(error: reqwest::Error) -> PostSourceError {
    if error.is_timeout() {
        PostSourceError::timeout(error.to_string())
    } else {
        PostSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PostSourceError {
    let preview = body_preview(body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PostSourceError::timeout(format!("status {}", status.as_u16()))
        }
        _ => PostSourceError::status(status.as_u16(), preview),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
