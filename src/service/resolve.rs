use crate::service::api::ServiceClient;
use crate::storage::{StorageHandle, now_unix};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("audio service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("audio service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("no playable audio url: {0}")]
    NoUrl(String),

    #[error("run yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("yt-dlp failed: {0}")]
    YtDlp(String),
}

/// Turns a track id into a URL the transport can open.
#[async_trait]
pub trait AudioResolver: Send + Sync {
    async fn resolve_audio_url(&self, track_id: &str) -> Result<String, ResolveError>;
}

#[async_trait]
impl AudioResolver for ServiceClient {
    async fn resolve_audio_url(&self, track_id: &str) -> Result<String, ResolveError> {
        self.audio_url(track_id).await
    }
}

/// Resolves through a local `yt-dlp` binary instead of the service.
#[derive(Debug, Clone, Default)]
pub struct YtDlpResolver {
    pub cookies: Option<PathBuf>,
    pub cookies_from_browser: Option<String>,
}

#[async_trait]
impl AudioResolver for YtDlpResolver {
    async fn resolve_audio_url(&self, track_id: &str) -> Result<String, ResolveError> {
        let mut cmd = Command::new("yt-dlp");
        cmd.args([
            "-f",
            "bestaudio[ext=m4a]/bestaudio/best",
            "--get-url",
            "--no-playlist",
        ]);

        // Prefer browser cookies when configured (no manual export needed).
        if let Some(browser) = &self.cookies_from_browser {
            cmd.arg("--cookies-from-browser").arg(browser);
        } else if let Some(cookies) = &self.cookies {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.arg(format!("https://www.youtube.com/watch?v={track_id}"));

        let out = cmd.output().await?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(ResolveError::YtDlp(stderr.trim().to_string()));
        }

        first_url_line(&String::from_utf8_lossy(&out.stdout))
            .ok_or_else(|| ResolveError::NoUrl(format!("yt-dlp printed nothing for {track_id}")))
    }
}

fn first_url_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Remembers resolved URLs in SQLite for `ttl_secs`. Cache errors fall
/// through to the wrapped resolver.
pub struct CachedResolver {
    inner: Arc<dyn AudioResolver>,
    storage: StorageHandle,
    ttl_secs: i64,
}

impl CachedResolver {
    pub fn new(inner: Arc<dyn AudioResolver>, storage: StorageHandle, ttl_secs: i64) -> Self {
        Self {
            inner,
            storage,
            ttl_secs,
        }
    }
}

#[async_trait]
impl AudioResolver for CachedResolver {
    async fn resolve_audio_url(&self, track_id: &str) -> Result<String, ResolveError> {
        let now = now_unix();

        let cached = tokio::task::spawn_blocking({
            let storage = self.storage.clone();
            let id = track_id.to_string();
            move || storage.get_stream_url(&id, now)
        })
        .await;
        match cached {
            Ok(Ok(Some(url))) => {
                tracing::debug!(track_id, "stream url cache hit");
                return Ok(url);
            }
            Ok(Ok(None)) => {}
            Ok(Err(e)) => tracing::warn!(track_id, "stream cache read failed: {e:#}"),
            Err(e) => tracing::warn!(track_id, "stream cache task failed: {e}"),
        }

        let url = self.inner.resolve_audio_url(track_id).await?;

        if self.ttl_secs > 0 {
            let expires_at = now + self.ttl_secs;
            let stored = tokio::task::spawn_blocking({
                let storage = self.storage.clone();
                let id = track_id.to_string();
                let url = url.clone();
                move || storage.cache_stream_url(&id, &url, expires_at, now)
            })
            .await;
            if let Ok(Err(e)) = stored {
                tracing::warn!(track_id, "stream cache write failed: {e:#}");
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AudioResolver for Counting {
        async fn resolve_audio_url(&self, track_id: &str) -> Result<String, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if track_id == "bad" {
                return Err(ResolveError::NoUrl(track_id.to_string()));
            }
            Ok(format!("https://cdn.example/{track_id}.m4a"))
        }
    }

    #[test]
    fn picks_first_non_empty_line() {
        assert_eq!(
            first_url_line("\n  https://a/1 \nhttps://a/2\n").as_deref(),
            Some("https://a/1")
        );
        assert!(first_url_line("  \n").is_none());
    }

    #[tokio::test]
    async fn cached_resolver_hits_inner_once() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageHandle::new(dir.path().join("cache.sqlite3"));
        let inner = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let resolver = CachedResolver::new(inner.clone(), storage, 3600);

        let first = resolver.resolve_audio_url("abc").await.unwrap();
        let second = resolver.resolve_audio_url("abc").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageHandle::new(dir.path().join("cache.sqlite3"));
        let inner = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let resolver = CachedResolver::new(inner.clone(), storage, 3600);

        assert!(matches!(
            resolver.resolve_audio_url("bad").await,
            Err(ResolveError::NoUrl(_))
        ));
        assert!(resolver.resolve_audio_url("bad").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
