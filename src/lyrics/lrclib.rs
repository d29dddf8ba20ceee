//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API serving plain and synchronized (LRC) lyrics.
//! API Documentation: https://lrclib.net/docs

use crate::lyrics::parser::ParsedLyrics;
use crate::lyrics::title::clean_song_title;
use crate::lyrics::LyricsBackend;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct LrclibResponse {
    #[serde(rename = "plainLyrics")]
    pub plain_lyrics: Option<String>,
    #[serde(rename = "syncedLyrics")]
    pub synced_lyrics: Option<String>,
}

impl LrclibResponse {
    /// Plain lyrics when present, otherwise synced lyrics without timestamps.
    pub fn into_text(self) -> Option<String> {
        if let Some(plain) = self.plain_lyrics.filter(|p| !p.trim().is_empty()) {
            return Some(plain.trim().to_string());
        }
        self.synced_lyrics
            .map(|s| ParsedLyrics::parse(&s).plain_text())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    const DEFAULT_BASE_URL: &'static str = "https://lrclib.net/api";
    const USER_AGENT: &'static str =
        concat!("musicstream/", env!("CARGO_PKG_VERSION"), " (lyrics lookup)");

    pub fn new(timeout: std::time::Duration) -> anyhow::Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: std::time::Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(Self::USER_AGENT)
                .timeout(timeout)
                .build()
                .context("build lrclib client")?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Exact match first (needs an artist), then free-text search.
    pub async fn get_lyrics(
        &self,
        track_name: &str,
        artist_name: Option<&str>,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        if let Some(artist) = artist_name
            && let Some(lyrics) = self.get_exact(track_name, artist).await?
        {
            return Ok(Some(lyrics));
        }

        self.search(track_name, artist_name).await
    }

    async fn get_exact(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        let url = format!(
            "{}/get?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(track_name),
            urlencoding::encode(artist_name)
        );

        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            anyhow::bail!("LRCLIB API error: {}", response.status());
        }
    }

    async fn search(
        &self,
        track_name: &str,
        artist_name: Option<&str>,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        let query = match artist_name {
            Some(artist) => format!("{track_name} {artist}"),
            None => track_name.to_string(),
        };
        let url = format!(
            "{}/search?q={}",
            self.base_url,
            urlencoding::encode(&query)
        );

        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            let results: Vec<LrclibResponse> = response.json().await?;
            Ok(pick_best(results))
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            anyhow::bail!("LRCLIB search error: {}", response.status());
        }
    }
}

fn pick_best(results: Vec<LrclibResponse>) -> Option<LrclibResponse> {
    let idx = results
        .iter()
        .position(|r| r.plain_lyrics.as_deref().is_some_and(|p| !p.trim().is_empty()))
        .or_else(|| (!results.is_empty()).then_some(0))?;
    results.into_iter().nth(idx)
}

#[async_trait]
impl LyricsBackend for LrclibClient {
    async fn fetch(&self, title: &str) -> anyhow::Result<Option<String>> {
        let cleaned = clean_song_title(title);
        if cleaned.song.is_empty() {
            return Ok(None);
        }
        let found = self
            .get_lyrics(&cleaned.song, cleaned.artist.as_deref())
            .await?;
        Ok(found.and_then(LrclibResponse::into_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(plain: Option<&str>, synced: Option<&str>) -> LrclibResponse {
        LrclibResponse {
            plain_lyrics: plain.map(str::to_string),
            synced_lyrics: synced.map(str::to_string),
        }
    }

    #[test]
    fn prefers_plain_text() {
        let r = resp(Some(" one\ntwo "), Some("[00:01.00]x"));
        assert_eq!(r.into_text().as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn flattens_synced_when_no_plain() {
        let r = resp(Some(""), Some("[00:02.00]b\n[00:01.00]a"));
        assert_eq!(r.into_text().as_deref(), Some("a\nb"));
        assert!(resp(None, None).into_text().is_none());
    }

    #[test]
    fn best_result_has_plain_lyrics() {
        let picked = pick_best(vec![
            resp(None, Some("[00:01.00]synced only")),
            resp(Some("plain"), None),
        ])
        .unwrap();
        assert_eq!(picked.plain_lyrics.as_deref(), Some("plain"));
        assert!(pick_best(Vec::new()).is_none());
    }

    #[test]
    fn parses_api_payload() {
        let raw = r#"{"id":1,"trackName":"T","artistName":"A","albumName":null,"duration":200.0,"plainLyrics":"la","syncedLyrics":null}"#;
        let r: LrclibResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(r.into_text().as_deref(), Some("la"));
    }
}
