use serde::{Deserialize, Serialize};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A playable unit. Equality is by `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Candidate URL from search; always re-resolved before playback.
    pub audio_url: Option<String>,
    pub duration_secs: Option<u32>,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: None,
            thumbnail_url: None,
            audio_url: None,
            duration_secs: None,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn artist_or_unknown(&self) -> &str {
        self.artist
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn display_line(&self) -> String {
        format!("{} - {}", self.title, self.artist_or_unknown())
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

/// One search hit as returned by the audio service.
///
/// The service has shipped two shapes: `{id,title,channel,thumbnail,duration}`
/// and `{id,title,artist,thumbnail}`; both map onto this struct.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    #[serde(default, alias = "artist")]
    pub channel: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Wrapped { videos: Vec<SearchHit> },
    Bare(Vec<SearchHit>),
}

impl SearchResponse {
    pub fn into_hits(self) -> Vec<SearchHit> {
        match self {
            SearchResponse::Wrapped { videos } => videos,
            SearchResponse::Bare(hits) => hits,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AudioUrlResponse {
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LyricsResponse {
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_compare_by_id() {
        let a = Track::new("x1", "Song").with_artist("Someone");
        let b = Track::new("x1", "Other title");
        assert_eq!(a, b);
        assert_ne!(a, Track::new("x2", "Song"));
    }

    #[test]
    fn missing_artist_displays_unknown() {
        let t = Track::new("x1", "Song");
        assert_eq!(t.artist_or_unknown(), "Unknown Artist");
        assert_eq!(Track::new("x1", "Song").with_artist("  ").artist_or_unknown(), "Unknown Artist");
        assert_eq!(t.display_line(), "Song - Unknown Artist");
    }

    #[test]
    fn parses_both_search_shapes() {
        let wrapped = r#"{"videos":[{"id":"a","title":"A","channel":"Chan","thumbnail":"t","duration":201}]}"#;
        let hits = serde_json::from_str::<SearchResponse>(wrapped).unwrap().into_hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].channel.as_deref(), Some("Chan"));
        assert_eq!(hits[0].duration, Some(201.0));

        let bare = r#"[{"id":"b","title":"B","artist":"Art","thumbnail":null}]"#;
        let hits = serde_json::from_str::<SearchResponse>(bare).unwrap().into_hits();
        assert_eq!(hits[0].channel.as_deref(), Some("Art"));
        assert!(hits[0].thumbnail.is_none());
    }
}
