use super::{
    AudioConfig, Config, InferenceConfig, InputConfig, LyricsBackendKind, LyricsConfig,
    PathsConfig, PlayerConfig, ResolverKind, ServiceConfig, UiConfig,
};

pub const SERVICE_URL: &str = "http://localhost:5002";
pub const INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
pub const SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const GENERATION_MODEL: &str = "gpt2";
pub const LYRICS_MODEL: &str = "gpt2-large";

fn data_dir() -> std::path::PathBuf {
    super::project_dirs()
        .map(|p| p.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("musicstream"))
}

pub fn defaults() -> Config {
    Config {
        paths: PathsConfig {
            data_dir: data_dir(),
        },
        service: ServiceConfig {
            base_url: SERVICE_URL.to_string(),
            timeout_secs: 30,
        },
        audio: AudioConfig {
            resolver: ResolverKind::Service,
            stream_cache_secs: 60 * 60,
            cookies: None,
            cookies_from_browser: None,
        },
        lyrics: LyricsConfig {
            backend: LyricsBackendKind::Service,
            cache: true,
            max_age_days: 7,
        },
        inference: InferenceConfig {
            base_url: INFERENCE_URL.to_string(),
            token: String::new(),
            sentiment_model: SENTIMENT_MODEL.to_string(),
            generation_model: GENERATION_MODEL.to_string(),
            lyrics_model: LYRICS_MODEL.to_string(),
            timeout_secs: 60,
        },
        player: PlayerConfig {
            audio_device: None,
            volume: 100,
        },
        input: InputConfig::default(),
        ui: UiConfig { compact_width: 60 },
    }
}
