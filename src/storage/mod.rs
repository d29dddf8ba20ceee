use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

pub fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS stream_cache (
  track_id TEXT PRIMARY KEY,
  url TEXT NOT NULL,
  expires_at INTEGER NOT NULL,
  updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS lyrics_cache (
  track_id TEXT PRIMARY KEY,
  lyrics TEXT NOT NULL,
  fetched_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_lyrics_fetched_at ON lyrics_cache(fetched_at);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    pub fn get_stream_url(&self, track_id: &str, now_unix: i64) -> anyhow::Result<Option<String>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT url, expires_at FROM stream_cache WHERE track_id=?1",
                params![track_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("query stream cache")?;
        Ok(row.and_then(|(url, exp)| (exp > now_unix).then_some(url)))
    }

    pub fn cache_stream_url(
        &self,
        track_id: &str,
        url: &str,
        expires_at: i64,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO stream_cache(track_id, url, expires_at, updated_at)
VALUES(?1, ?2, ?3, ?4)
ON CONFLICT(track_id) DO UPDATE SET
  url=excluded.url,
  expires_at=excluded.expires_at,
  updated_at=excluded.updated_at
"#,
                params![track_id, url, expires_at, now_unix],
            )
            .context("cache stream url")?;
        Ok(())
    }

    /// Lyrics fetched at or after `not_before`, if any.
    pub fn get_lyrics(&self, track_id: &str, not_before: i64) -> anyhow::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT lyrics FROM lyrics_cache WHERE track_id=?1 AND fetched_at>=?2",
                params![track_id, not_before],
                |row| row.get(0),
            )
            .optional()
            .context("query lyrics cache")
    }

    pub fn cache_lyrics(&self, track_id: &str, lyrics: &str, now_unix: i64) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO lyrics_cache(track_id, lyrics, fetched_at)
VALUES(?1, ?2, ?3)
ON CONFLICT(track_id) DO UPDATE SET
  lyrics=excluded.lyrics,
  fetched_at=excluded.fetched_at
"#,
                params![track_id, lyrics, now_unix],
            )
            .context("cache lyrics")?;
        Ok(())
    }

    /// Drops lyrics older than `older_than` and expired stream URLs.
    pub fn prune(&self, older_than: i64, now_unix: i64) -> anyhow::Result<usize> {
        let lyrics = self
            .conn
            .execute(
                "DELETE FROM lyrics_cache WHERE fetched_at<?1",
                params![older_than],
            )
            .context("prune lyrics cache")?;
        let streams = self
            .conn
            .execute(
                "DELETE FROM stream_cache WHERE expires_at<=?1",
                params![now_unix],
            )
            .context("prune stream cache")?;
        Ok(lyrics + streams)
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch("DELETE FROM lyrics_cache; DELETE FROM stream_cache;")
            .context("clear cache")?;
        Ok(())
    }

    pub fn counts(&self) -> anyhow::Result<(u64, u64)> {
        let lyrics: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lyrics_cache", [], |r| r.get(0))?;
        let streams: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM stream_cache", [], |r| r.get(0))?;
        Ok((lyrics as u64, streams as u64))
    }
}

// Simple way to use rusqlite from async tasks: open per-operation.
#[derive(Debug, Clone)]
pub struct StorageHandle {
    path: PathBuf,
}

impl StorageHandle {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> anyhow::Result<Storage> {
        Storage::open(&self.path)
    }

    pub fn get_stream_url(&self, track_id: &str, now_unix: i64) -> anyhow::Result<Option<String>> {
        self.open()?.get_stream_url(track_id, now_unix)
    }

    pub fn cache_stream_url(
        &self,
        track_id: &str,
        url: &str,
        expires_at: i64,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.open()?
            .cache_stream_url(track_id, url, expires_at, now_unix)
    }

    pub fn get_lyrics(&self, track_id: &str, not_before: i64) -> anyhow::Result<Option<String>> {
        self.open()?.get_lyrics(track_id, not_before)
    }

    pub fn cache_lyrics(&self, track_id: &str, lyrics: &str, now_unix: i64) -> anyhow::Result<()> {
        self.open()?.cache_lyrics(track_id, lyrics, now_unix)
    }

    pub fn prune(&self, older_than: i64, now_unix: i64) -> anyhow::Result<usize> {
        self.open()?.prune(older_than, now_unix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let s = Storage::open(&dir.path().join("nested").join("cache.sqlite3")).unwrap();
        (dir, s)
    }

    #[test]
    fn stream_urls_expire() {
        let (_dir, s) = open_temp();
        s.cache_stream_url("v1", "https://a/1", 200, 100).unwrap();
        assert_eq!(s.get_stream_url("v1", 150).unwrap().as_deref(), Some("https://a/1"));
        assert!(s.get_stream_url("v1", 200).unwrap().is_none());
        assert!(s.get_stream_url("missing", 0).unwrap().is_none());
    }

    #[test]
    fn lyrics_respect_max_age() {
        let (_dir, s) = open_temp();
        s.cache_lyrics("v1", "la la", 1_000).unwrap();
        assert_eq!(s.get_lyrics("v1", 1_000).unwrap().as_deref(), Some("la la"));
        assert!(s.get_lyrics("v1", 1_001).unwrap().is_none());

        s.cache_lyrics("v1", "updated", 2_000).unwrap();
        assert_eq!(s.get_lyrics("v1", 1_500).unwrap().as_deref(), Some("updated"));
    }

    #[test]
    fn prune_and_clear() {
        let (_dir, s) = open_temp();
        s.cache_lyrics("old", "x", 10).unwrap();
        s.cache_lyrics("new", "y", 500).unwrap();
        s.cache_stream_url("gone", "u", 50, 0).unwrap();
        s.cache_stream_url("kept", "u", 5_000, 0).unwrap();

        assert_eq!(s.prune(100, 100).unwrap(), 2);
        assert_eq!(s.counts().unwrap(), (1, 1));

        s.clear().unwrap();
        assert_eq!(s.counts().unwrap(), (0, 0));
    }
}
