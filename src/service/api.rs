use crate::service::models::{
    AudioUrlResponse, ErrorResponse, LyricsResponse, SearchHit, SearchResponse, Track,
};
use crate::service::resolve::ResolveError;
use anyhow::Context;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::sync::Arc;
use std::time::Duration;

/// Message the lyrics endpoints use in place of a 404 body.
const SERVICE_NOT_FOUND: &str = "Lyrics not found";

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
}

/// Client for the audio-extraction service (`/search`, `/get-audio-url/:id`,
/// `/lyrics`). Cheap to clone.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    inner: Arc<Inner>,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("musicstream/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The candidate audio URL a search hit advertises for `id`.
    pub fn audio_url_for(&self, id: &str) -> String {
        format!("{}/get-audio-url/{}", self.inner.base_url, urlencoding::encode(id))
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<Track>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/search?query={}",
            self.inner.base_url,
            urlencoding::encode(query)
        );
        let resp = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .context("send search request")?;

        let status = resp.status();
        if !status.is_success() {
            let message = error_message(resp).await;
            anyhow::bail!("search failed ({status}): {message}");
        }

        let parsed: SearchResponse = resp.json().await.context("parse search json")?;
        let tracks = hits_to_tracks(parsed.into_hits(), self);
        tracing::debug!(query, results = tracks.len(), "search finished");
        Ok(tracks)
    }

    pub async fn search_raw(&self, query: &str) -> anyhow::Result<serde_json::Value> {
        let url = format!(
            "{}/search?query={}",
            self.inner.base_url,
            urlencoding::encode(query)
        );
        self.inner
            .http
            .get(&url)
            .send()
            .await
            .context("send search request")?
            .error_for_status()
            .context("search http status")?
            .json()
            .await
            .context("parse search json")
    }

    pub async fn audio_url(&self, id: &str) -> Result<String, ResolveError> {
        let resp = self.inner.http.get(self.audio_url_for(id)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResolveError::Status {
                status: status.as_u16(),
                message: error_message(resp).await,
            });
        }

        let body: AudioUrlResponse = resp.json().await?;
        match body.url {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(ResolveError::NoUrl(
                body.error.unwrap_or_else(|| id.to_string()),
            )),
        }
    }

    /// `Ok(None)` when the service has no lyrics for `title`.
    pub async fn lyrics(&self, title: &str) -> anyhow::Result<Option<String>> {
        let url = format!(
            "{}/lyrics?title={}",
            self.inner.base_url,
            urlencoding::encode(title)
        );
        let resp = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .context("send lyrics request")?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let body: LyricsResponse = resp.json().await.context("parse lyrics json")?;
                Ok(body
                    .lyrics
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty() && l != SERVICE_NOT_FOUND))
            }
            s => {
                let message = error_message(resp).await;
                anyhow::bail!("lyrics request failed ({s}): {message}");
            }
        }
    }
}

pub(crate) fn hits_to_tracks(hits: Vec<SearchHit>, client: &ServiceClient) -> Vec<Track> {
    hits.into_iter()
        .filter(|h| !h.id.is_empty())
        .map(|h| Track {
            audio_url: Some(client.audio_url_for(&h.id)),
            duration_secs: h.duration.filter(|d| *d > 0.0).map(|d| d.round() as u32),
            artist: h.channel.filter(|c| !c.trim().is_empty()),
            thumbnail_url: h.thumbnail.filter(|t| !t.is_empty()),
            title: h.title,
            id: h.id,
        })
        .collect()
}

async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.text().await {
        Ok(body) => serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                let body = body.trim();
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.chars().take(200).collect()
                }
            }),
        Err(_) => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ServiceClient {
        ServiceClient::new("http://localhost:5002/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_is_normalized() {
        let c = client();
        assert_eq!(c.base_url(), "http://localhost:5002");
        assert_eq!(c.audio_url_for("abc"), "http://localhost:5002/get-audio-url/abc");
    }

    #[test]
    fn hits_become_tracks() {
        let hits = vec![
            SearchHit {
                id: "v1".into(),
                title: "Song".into(),
                channel: Some("Channel".into()),
                thumbnail: Some(String::new()),
                duration: Some(212.4),
            },
            SearchHit {
                id: String::new(),
                title: "Broken".into(),
                channel: None,
                thumbnail: None,
                duration: None,
            },
        ];
        let tracks = hits_to_tracks(hits, &client());
        assert_eq!(tracks.len(), 1);
        let t = &tracks[0];
        assert_eq!(t.id, "v1");
        assert_eq!(t.artist.as_deref(), Some("Channel"));
        assert!(t.thumbnail_url.is_none());
        assert_eq!(t.duration_secs, Some(212));
        assert_eq!(
            t.audio_url.as_deref(),
            Some("http://localhost:5002/get-audio-url/v1")
        );
    }

    #[tokio::test]
    async fn empty_query_skips_request() {
        // Unroutable base URL: any request would fail.
        let c = ServiceClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        assert!(c.search("   ").await.unwrap().is_empty());
    }
}
