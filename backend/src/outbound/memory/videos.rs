//! In-memory video record store.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{VideoRepository, VideoRepositoryError};
use crate::domain::{Video, VideoId};

use super::lock;

#[derive(Debug, Default)]
pub struct MemoryVideoStore {
    videos: Mutex<Vec<Video>>,
}

impl MemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoRepository for MemoryVideoStore {
    async fn save(&self, video: &Video) -> Result<(), VideoRepositoryError> {
        let mut videos = lock(&self.videos, VideoRepositoryError::query)?;
        if videos
            .iter()
            .any(|stored| stored.url == video.url && stored.id != video.id)
        {
            return Err(VideoRepositoryError::duplicate(video.url.clone()));
        }
        match videos.iter_mut().find(|stored| stored.id == video.id) {
            Some(stored) => *stored = video.clone(),
            None => videos.push(video.clone()),
        }
        Ok(())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Video>, VideoRepositoryError> {
        let videos = lock(&self.videos, VideoRepositoryError::query)?;
        Ok(videos.iter().find(|video| video.url == url).cloned())
    }

    async fn list(&self) -> Result<Vec<Video>, VideoRepositoryError> {
        let mut videos = lock(&self.videos, VideoRepositoryError::query)?.clone();
        videos.sort_by_key(|video| video.created_at);
        Ok(videos)
    }

    async fn delete(&self, id: &VideoId) -> Result<Option<Video>, VideoRepositoryError> {
        let mut videos = lock(&self.videos, VideoRepositoryError::query)?;
        let position = videos.iter().position(|video| video.id == *id);
        Ok(position.map(|index| videos.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::epoch;
    use rstest::rstest;

    fn video(url: &str) -> Video {
        Video {
            id: VideoId::generate(),
            url: url.to_owned(),
            duration: 3.0,
            screenshot: None,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn urls_are_unique_across_records() {
        let store = MemoryVideoStore::new();
        store.save(&video("https://a.example/v")).await.expect("first");

        let error = store
            .save(&video("https://a.example/v"))
            .await
            .expect_err("same url, new id");

        assert_eq!(error, VideoRepositoryError::duplicate("https://a.example/v"));
        assert_eq!(store.list().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn saving_the_same_id_replaces_the_record() {
        let store = MemoryVideoStore::new();
        let mut original = video("https://a.example/v");
        store.save(&original).await.expect("insert");
        original.duration = 9.5;
        store.save(&original).await.expect("replace");

        let found = store
            .find_by_url("https://a.example/v")
            .await
            .expect("find")
            .expect("present");
        assert!((found.duration - 9.5).abs() < 1e-9);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_returns_the_removed_record() {
        let store = MemoryVideoStore::new();
        let stored = video("https://a.example/v");
        store.save(&stored).await.expect("insert");

        assert_eq!(store.delete(&stored.id).await.expect("delete"), Some(stored.clone()));
        assert_eq!(store.delete(&stored.id).await.expect("delete"), None);
    }
}
