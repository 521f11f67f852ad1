//! Wire shapes of the upstream "public posts" endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::ports::PostCandidate;

#[derive(Debug, Serialize)]
pub(super) struct FetchRequestDto {
    #[serde(rename = "NumToFetch")]
    pub(super) num_to_fetch: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct PostsFoundDto {
    #[serde(rename = "PostsFound", default)]
    pub(super) posts_found: Option<Vec<UpstreamPostDto>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct UpstreamPostDto {
    post_hash_hex: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    comment_count: i64,
    #[serde(default)]
    like_count: i64,
    #[serde(default)]
    diamond_count: i64,
    #[serde(rename = "PosterPublicKeyBase58Check")]
    poster_public_key: String,
    #[serde(rename = "VideoURLs", default)]
    video_urls: Option<Vec<String>>,
    #[serde(default)]
    profile_entry_response: Option<ProfileEntryDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProfileEntryDto {
    #[serde(default)]
    username: Option<String>,
}

impl PostsFoundDto {
    /// Missing or null `PostsFound` decodes as no candidates.
    pub(super) fn into_candidates(self) -> Vec<PostCandidate> {
        self.posts_found
            .unwrap_or_default()
            .into_iter()
            .map(UpstreamPostDto::into_candidate)
            .collect()
    }
}

impl UpstreamPostDto {
    fn into_candidate(self) -> PostCandidate {
        PostCandidate {
            post_hash: self.post_hash_hex,
            body: self.body,
            comment_count: self.comment_count,
            like_count: self.like_count,
            gift_count: self.diamond_count,
            poster_public_key: self.poster_public_key,
            username: self
                .profile_entry_response
                .and_then(|profile| profile.username)
                .filter(|name| !name.is_empty()),
            video_urls: self.video_urls.unwrap_or_default(),
        }
    }
}
