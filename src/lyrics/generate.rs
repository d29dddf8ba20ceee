use crate::inference::{GenerationParams, InferenceClient};
use crate::lyrics::LyricsBackend;
use crate::lyrics::title::clean_song_title;
use crate::service::models::UNKNOWN_ARTIST;
use async_trait::async_trait;

/// Lyrics written by a hosted text-generation model.
pub struct GeneratedLyrics {
    client: InferenceClient,
    model: String,
}

impl GeneratedLyrics {
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

fn prompt_for(song: &str, artist: &str) -> String {
    format!("Generate lyrics for the song \"{song}\" by {artist}:\n\n")
}

/// Drops the echoed prompt and blank lines.
fn tidy(generated: &str, prompt: &str) -> String {
    let body = generated.strip_prefix(prompt).unwrap_or(generated);
    body.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl LyricsBackend for GeneratedLyrics {
    async fn fetch(&self, title: &str) -> anyhow::Result<Option<String>> {
        let cleaned = clean_song_title(title);
        let artist = cleaned.artist.as_deref().unwrap_or(UNKNOWN_ARTIST);
        let prompt = prompt_for(&cleaned.song, artist);

        let params = GenerationParams {
            max_length: 500,
            temperature: 0.7,
            num_return_sequences: 1,
            top_p: Some(0.9),
        };
        let generated = self.client.generate(&self.model, &prompt, &params).await?;

        let lyrics = tidy(&generated, &prompt);
        Ok((!lyrics.is_empty()).then_some(lyrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_shape() {
        assert_eq!(
            prompt_for("Yesterday", "The Beatles"),
            "Generate lyrics for the song \"Yesterday\" by The Beatles:\n\n"
        );
    }

    #[test]
    fn tidy_strips_prompt_and_blank_lines() {
        let prompt = prompt_for("S", "A");
        let generated = format!("{prompt}line one\n\n   \nline two  \n");
        assert_eq!(tidy(&generated, &prompt), "line one\nline two");
        assert_eq!(tidy("\n\n", &prompt), "");
    }
}
