//! Video titles to (artist, song) pairs.
//!
//! Search hits carry YouTube video titles such as
//! `"Artist - Song (Official Video) [4K] | Label"`; lyrics providers want the
//! bare song name and, when it can be guessed, the artist.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));
static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));

const NOISE_PREFIXES: [&str; 5] = [
    "Exclusive:",
    "Official:",
    "Full Video Song",
    "Full Song",
    "Video:",
];

// First match wins.
const SEPARATORS: [&str; 4] = [" - ", " \u{2013} ", " by ", ": "];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanTitle {
    pub artist: Option<String>,
    pub song: String,
}

pub fn clean_song_title(full_title: &str) -> CleanTitle {
    let mut title = full_title.to_string();
    for prefix in NOISE_PREFIXES {
        title = title.replace(prefix, "");
    }

    let title = BRACKETS.replace_all(&title, "");
    let title = PARENS.replace_all(&title, "");

    let title = title.split('|').next().unwrap_or_default();
    let title = title.split(',').next().unwrap_or_default();

    let (artist, song) = SEPARATORS
        .iter()
        .find_map(|sep| {
            let mut parts = title.split(sep);
            let artist = parts.next()?;
            let song = parts.next()?;
            Some((Some(artist), song))
        })
        .unwrap_or((None, title));

    CleanTitle {
        artist: artist.map(collapse_whitespace).filter(|a| !a.is_empty()),
        song: collapse_whitespace(song),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_artist_and_song() {
        let c = clean_song_title("Adele - Someone Like You (Official Music Video)");
        assert_eq!(c.artist.as_deref(), Some("Adele"));
        assert_eq!(c.song, "Someone Like You");
    }

    #[test]
    fn strips_noise() {
        let c = clean_song_title("Exclusive: Love Dose [Full Video]  Song | Label Records, 2014");
        assert_eq!(c.artist, None);
        assert_eq!(c.song, "Love Dose Song");
    }

    #[test]
    fn first_separator_wins() {
        let c = clean_song_title("Here Comes the Sun by The Beatles - Remastered");
        assert_eq!(c.artist.as_deref(), Some("Here Comes the Sun by The Beatles"));
        assert_eq!(c.song, "Remastered");

        let c = clean_song_title("Queen: Bohemian   Rhapsody");
        assert_eq!(c.artist.as_deref(), Some("Queen"));
        assert_eq!(c.song, "Bohemian Rhapsody");
    }

    #[test]
    fn en_dash_separator() {
        let c = clean_song_title("Survivor \u{2013} Eye of the Tiger");
        assert_eq!(c.artist.as_deref(), Some("Survivor"));
        assert_eq!(c.song, "Eye of the Tiger");
    }

    #[test]
    fn plain_title_is_kept() {
        let c = clean_song_title("  Yesterday ");
        assert_eq!(c, CleanTitle { artist: None, song: "Yesterday".into() });
    }
}
