//! Mood-based song recommendations for the chat screen.
//!
//! Keyword detection always works offline. With an inference token the
//! assistant asks a sentiment model for the mood and a generation model for
//! the songs, and drops back to keywords whenever either call fails.

use crate::inference::{GenerationParams, InferenceClient};
use once_cell::sync::Lazy;
use regex::Regex;

pub const GREETING: &str = "Hi! I'm your music mood assistant. How are you feeling today? \
     (happy, sad, energetic, romantic, or relaxed)";

const UNKNOWN_MOOD: &str =
    "I'm not sure about that mood. Try saying 'happy', 'sad', 'energetic', 'romantic', or 'relaxed'!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Romantic,
    Relaxed,
}

impl Mood {
    /// First keyword match wins, in declaration order.
    pub fn detect(message: &str) -> Option<Mood> {
        let m = message.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| m.contains(w));
        if has(&["happy"]) {
            Some(Mood::Happy)
        } else if has(&["sad"]) {
            Some(Mood::Sad)
        } else if has(&["energetic", "energy"]) {
            Some(Mood::Energetic)
        } else if has(&["romantic", "love"]) {
            Some(Mood::Romantic)
        } else if has(&["relax", "calm"]) {
            Some(Mood::Relaxed)
        } else {
            None
        }
    }

    pub fn reply(self) -> &'static str {
        match self {
            Mood::Happy => "Here are some happy songs to boost your mood! Pick one to play it:",
            Mood::Sad => "These songs might help express your feelings. Pick any to play:",
            Mood::Energetic => "Let's get your energy up with these songs! Pick one to play:",
            Mood::Romantic => "Here are some romantic tunes for you. Pick one to play:",
            Mood::Relaxed => "These songs should help you relax. Pick any to play:",
        }
    }

    pub fn suggestions(self) -> Vec<Suggestion> {
        let pairs: &[(&str, &str)] = match self {
            Mood::Happy => &[
                ("Don't Stop Believin'", "Journey"),
                ("Happy", "Pharrell Williams"),
                ("I Wanna Dance with Somebody", "Whitney Houston"),
                ("Walking on Sunshine", "Katrina & The Waves"),
                ("Uptown Funk", "Mark Ronson ft. Bruno Mars"),
            ],
            Mood::Sad => &[
                ("Someone Like You", "Adele"),
                ("All By Myself", "Celine Dion"),
                ("Yesterday", "The Beatles"),
                ("Say Something", "A Great Big World"),
                ("The Sound of Silence", "Simon & Garfunkel"),
            ],
            Mood::Energetic => &[
                ("Eye of the Tiger", "Survivor"),
                ("Can't Hold Us", "Macklemore"),
                ("Stronger", "Kanye West"),
                ("Thunder", "Imagine Dragons"),
                ("Levels", "Avicii"),
            ],
            Mood::Romantic => &[
                ("Perfect", "Ed Sheeran"),
                ("All of Me", "John Legend"),
                ("Just the Way You Are", "Bruno Mars"),
                ("At Last", "Etta James"),
                ("Can't Help Falling in Love", "Elvis Presley"),
            ],
            Mood::Relaxed => &[
                ("Somewhere Over the Rainbow", "Israel Kamakawiwo'ole"),
                ("What a Wonderful World", "Louis Armstrong"),
                ("Peaceful Easy Feeling", "Eagles"),
                ("Here Comes the Sun", "The Beatles"),
                ("Three Little Birds", "Bob Marley"),
            ],
        };
        pairs
            .iter()
            .map(|(title, artist)| Suggestion::new(*title, Some(*artist)))
            .collect()
    }
}

/// A song the user can pick; resolved by searching for [`Suggestion::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    pub artist: Option<String>,
}

impl Suggestion {
    pub fn new(title: impl Into<String>, artist: Option<&str>) -> Self {
        Self {
            title: title.into(),
            artist: artist.map(str::to_string),
        }
    }

    pub fn query(&self) -> String {
        match &self.artist {
            Some(a) => format!("{} {}", self.title, a),
            None => self.title.clone(),
        }
    }

    pub fn label(&self) -> String {
        match &self.artist {
            Some(a) => format!("{} - {}", self.title, a),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub suggestions: Vec<Suggestion>,
}

pub fn keyword_reply(message: &str) -> Reply {
    match Mood::detect(message) {
        Some(mood) => Reply {
            text: mood.reply().to_string(),
            suggestions: mood.suggestions(),
        },
        None => Reply {
            text: UNKNOWN_MOOD.to_string(),
            suggestions: Vec::new(),
        },
    }
}

static RECOMMENDATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)["'](.+?)["']\s+by\s+(.+?)(?:[,.]\s|$)"#).expect("valid regex")
});

/// `"Title" by Artist` mentions in free text.
pub fn extract_recommendations(text: &str) -> Vec<Suggestion> {
    RECOMMENDATION_RE
        .captures_iter(text)
        .map(|c| Suggestion::new(c[1].trim(), Some(c[2].trim())))
        .collect()
}

fn mood_prompt(label: &str, message: &str) -> String {
    format!(
        "Given the mood: {label} and context: \"{message}\", suggest 3 songs that would be \
         perfect for this situation. Include both Hindi and English songs."
    )
}

#[derive(Debug, Clone)]
struct Models {
    client: InferenceClient,
    sentiment: String,
    generation: String,
}

/// Chat backend. Cloneable so replies can be computed off the UI task.
#[derive(Debug, Clone, Default)]
pub struct Assistant {
    models: Option<Models>,
}

impl Assistant {
    /// Keywords only.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_inference(
        client: InferenceClient,
        sentiment_model: impl Into<String>,
        generation_model: impl Into<String>,
    ) -> Self {
        Self {
            models: Some(Models {
                client,
                sentiment: sentiment_model.into(),
                generation: generation_model.into(),
            }),
        }
    }

    pub fn uses_inference(&self) -> bool {
        self.models.is_some()
    }

    pub async fn reply(&self, message: &str) -> Reply {
        let Some(models) = &self.models else {
            return keyword_reply(message);
        };
        match inference_reply(models, message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("mood inference failed, using keywords: {e:#}");
                keyword_reply(message)
            }
        }
    }
}

async fn inference_reply(models: &Models, message: &str) -> anyhow::Result<Reply> {
    let sentiment = models.client.classify(&models.sentiment, message).await?;
    tracing::debug!(label = %sentiment.label, score = sentiment.score, "sentiment");

    let prompt = mood_prompt(&sentiment.label, message);
    let generated = models
        .client
        .generate(&models.generation, &prompt, &GenerationParams::default())
        .await?;
    let body = generated.strip_prefix(&prompt).unwrap_or(&generated).trim();
    if body.is_empty() {
        anyhow::bail!("model returned only the prompt");
    }

    let mut suggestions = extract_recommendations(body);
    if suggestions.is_empty() {
        suggestions = body
            .lines()
            .map(|l| l.trim().trim_start_matches(['-', '*', '•']).trim())
            .filter(|l| !l.is_empty())
            .map(|l| Suggestion::new(l, None))
            .collect();
    }

    Ok(Reply {
        text: body.to_string(),
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_moods_in_priority_order() {
        assert_eq!(Mood::detect("I'm so HAPPY"), Some(Mood::Happy));
        assert_eq!(Mood::detect("happy but sad"), Some(Mood::Happy));
        assert_eq!(Mood::detect("need some energy"), Some(Mood::Energetic));
        assert_eq!(Mood::detect("in love"), Some(Mood::Romantic));
        assert_eq!(Mood::detect("want to stay calm"), Some(Mood::Relaxed));
        assert_eq!(Mood::detect("relaxing evening"), Some(Mood::Relaxed));
        assert_eq!(Mood::detect("meh"), None);
    }

    #[test]
    fn every_mood_has_five_suggestions() {
        for mood in [Mood::Happy, Mood::Sad, Mood::Energetic, Mood::Romantic, Mood::Relaxed] {
            assert_eq!(mood.suggestions().len(), 5, "{mood:?}");
        }
        let first = &Mood::Sad.suggestions()[0];
        assert_eq!(first.label(), "Someone Like You - Adele");
        assert_eq!(first.query(), "Someone Like You Adele");
    }

    #[test]
    fn unknown_mood_gets_help() {
        let r = keyword_reply("what's up");
        assert!(r.suggestions.is_empty());
        assert!(r.text.contains("'relaxed'"));
    }

    #[test]
    fn extracts_quoted_title_by_artist() {
        let text = "Try \"Tum Hi Ho\" by Arijit Singh, 'Fix You' by Coldplay. Also \"Lovely\" by Billie Eilish";
        let got = extract_recommendations(text);
        assert_eq!(
            got,
            vec![
                Suggestion::new("Tum Hi Ho", Some("Arijit Singh")),
                Suggestion::new("Fix You", Some("Coldplay")),
                Suggestion::new("Lovely", Some("Billie Eilish")),
            ]
        );
        assert!(extract_recommendations("no songs here").is_empty());
    }

    #[test]
    fn prompt_matches_expected_wording() {
        assert_eq!(
            mood_prompt("POSITIVE", "sunny day"),
            "Given the mood: POSITIVE and context: \"sunny day\", suggest 3 songs that would be perfect for this situation. Include both Hindi and English songs."
        );
    }

    #[tokio::test]
    async fn offline_assistant_uses_keywords() {
        let a = Assistant::offline();
        assert!(!a.uses_inference());
        let r = a.reply("feeling romantic").await;
        assert_eq!(r.text, Mood::Romantic.reply());
        assert_eq!(r.suggestions[0].title, "Perfect");
    }
}
