//! Lyrics lookup for the current track.
//!
//! This module provides:
//! - [`LyricsClient`]: the total, cache-aware lookup the coordinator uses
//! - backends: the audio service, LRCLIB, and generated lyrics
//! - title cleanup for backends that search by song/artist

pub mod generate;
pub mod lrclib;
pub mod parser;
pub mod title;

use crate::service::api::ServiceClient;
use crate::service::models::Track;
use crate::storage::{StorageHandle, now_unix};
use async_trait::async_trait;
use std::sync::Arc;

pub use lrclib::LrclibClient;
pub use parser::ParsedLyrics;

pub const NOT_FOUND: &str = "Lyrics not found.";
pub const FETCH_FAILED: &str = "Failed to fetch lyrics.";

/// Lyrics lookup that never fails: errors become fallback text.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    async fn lyrics_for(&self, track: &Track) -> String;
}

/// A provider that can fail. `Ok(None)` means it has nothing for the title.
#[async_trait]
pub trait LyricsBackend: Send + Sync {
    async fn fetch(&self, title: &str) -> anyhow::Result<Option<String>>;
}

#[async_trait]
impl LyricsBackend for ServiceClient {
    async fn fetch(&self, title: &str) -> anyhow::Result<Option<String>> {
        self.lyrics(title).await
    }
}

/// Local cache keyed by track id with a fixed maximum age.
#[derive(Debug, Clone)]
pub struct LyricsCache {
    storage: StorageHandle,
    max_age_secs: i64,
}

impl LyricsCache {
    pub fn new(storage: StorageHandle, max_age_secs: i64) -> Self {
        Self {
            storage,
            max_age_secs,
        }
    }

    async fn get(&self, track_id: &str) -> Option<String> {
        let not_before = now_unix() - self.max_age_secs;
        let res = tokio::task::spawn_blocking({
            let storage = self.storage.clone();
            let id = track_id.to_string();
            move || storage.get_lyrics(&id, not_before)
        })
        .await;
        match res {
            Ok(Ok(hit)) => hit,
            Ok(Err(e)) => {
                tracing::warn!(track_id, "lyrics cache read failed: {e:#}");
                None
            }
            Err(e) => {
                tracing::warn!(track_id, "lyrics cache task failed: {e}");
                None
            }
        }
    }

    async fn put(&self, track_id: &str, lyrics: &str) {
        let res = tokio::task::spawn_blocking({
            let storage = self.storage.clone();
            let id = track_id.to_string();
            let lyrics = lyrics.to_string();
            move || storage.cache_lyrics(&id, &lyrics, now_unix())
        })
        .await;
        if let Ok(Err(e)) = res {
            tracing::warn!(track_id, "lyrics cache write failed: {e:#}");
        }
    }

    /// Remove entries past the maximum age. Returns the number of rows dropped.
    pub async fn prune(&self) -> anyhow::Result<usize> {
        let now = now_unix();
        let older_than = now - self.max_age_secs;
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || storage.prune(older_than, now)).await?
    }
}

pub struct LyricsClient {
    backend: Arc<dyn LyricsBackend>,
    cache: Option<LyricsCache>,
}

impl LyricsClient {
    pub fn new(backend: Arc<dyn LyricsBackend>, cache: Option<LyricsCache>) -> Self {
        Self { backend, cache }
    }
}

#[async_trait]
impl LyricsSource for LyricsClient {
    async fn lyrics_for(&self, track: &Track) -> String {
        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(&track.id).await
        {
            tracing::debug!(track_id = %track.id, "lyrics cache hit");
            return hit;
        }

        match self.backend.fetch(&track.title).await {
            Ok(Some(lyrics)) => {
                if let Some(cache) = &self.cache {
                    cache.put(&track.id, &lyrics).await;
                }
                lyrics
            }
            Ok(None) => NOT_FOUND.to_string(),
            Err(e) => {
                tracing::warn!(title = %track.title, "lyrics fetch failed: {e:#}");
                FETCH_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LyricsBackend for Scripted {
        async fn fetch(&self, title: &str) -> anyhow::Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match title {
                "missing" => Ok(None),
                "broken" => anyhow::bail!("upstream 500"),
                t => Ok(Some(format!("words of {t}"))),
            }
        }
    }

    fn scripted() -> Arc<Scripted> {
        Arc::new(Scripted {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn failures_become_fallback_text() {
        let client = LyricsClient::new(scripted(), None);
        assert_eq!(client.lyrics_for(&Track::new("1", "missing")).await, NOT_FOUND);
        assert_eq!(client.lyrics_for(&Track::new("2", "broken")).await, FETCH_FAILED);
        assert_eq!(client.lyrics_for(&Track::new("3", "Song")).await, "words of Song");
    }

    #[tokio::test]
    async fn cache_is_keyed_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LyricsCache::new(StorageHandle::new(dir.path().join("c.sqlite3")), 7 * 86_400);
        let backend = scripted();
        let client = LyricsClient::new(backend.clone(), Some(cache));

        let t = Track::new("id-1", "Song");
        assert_eq!(client.lyrics_for(&t).await, "words of Song");
        assert_eq!(client.lyrics_for(&t).await, "words of Song");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        // Fallbacks are never cached.
        let m = Track::new("id-2", "missing");
        client.lyrics_for(&m).await;
        client.lyrics_for(&m).await;
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unusable_cache_does_not_change_results() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the database file should be: every open fails.
        let bogus = dir.path().join("not-a-db");
        std::fs::create_dir_all(&bogus).unwrap();
        let cache = LyricsCache::new(StorageHandle::new(bogus), 60);
        let client = LyricsClient::new(scripted(), Some(cache));

        assert_eq!(client.lyrics_for(&Track::new("x", "Song")).await, "words of Song");
    }
}
