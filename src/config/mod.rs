use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod defaults;

pub const TOKEN_ENV: &str = "HUGGING_FACE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub lyrics: LyricsConfig,
    pub inference: InferenceConfig,
    pub player: PlayerConfig,
    pub input: InputConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Audio-extraction service (search, audio urls, lyrics).
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    Service,
    Ytdlp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub resolver: ResolverKind,
    /// How long a resolved stream url is reused; 0 disables the cache.
    pub stream_cache_secs: i64,
    /// Path to a Netscape cookie file (yt-dlp compatible).
    pub cookies: Option<PathBuf>,
    /// Use yt-dlp `--cookies-from-browser` (e.g. "chrome", "firefox", "brave").
    pub cookies_from_browser: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsBackendKind {
    Service,
    Lrclib,
    Generate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub backend: LyricsBackendKind,
    pub cache: bool,
    pub max_age_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    /// Empty means "read `HUGGING_FACE_API_KEY`".
    pub token: String,
    pub sentiment_model: String,
    pub generation_model: String,
    pub lyrics_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv audio device name (see `mpv --audio-device=help`)
    pub audio_device: Option<String>,
    /// Volume level (0-100)
    pub volume: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Below this many columns the player starts minimized.
    pub compact_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        defaults::defaults()
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        defaults::defaults().paths
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        defaults::defaults().service
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        defaults::defaults().audio
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        defaults::defaults().lyrics
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        defaults::defaults().inference
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        defaults::defaults().player
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { mouse: true }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        defaults::defaults().ui
    }
}

impl Config {
    pub fn cache_db_path(&self) -> PathBuf {
        self.paths.data_dir.join("cache.sqlite3")
    }

    pub fn log_path(&self) -> PathBuf {
        self.paths.data_dir.join("musicstream.log")
    }

    pub fn mpv_log_path(&self) -> PathBuf {
        self.paths.data_dir.join("mpv.log")
    }

    pub fn initial_volume(&self) -> f64 {
        f64::from(self.player.volume.min(100)) / 100.0
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.player.volume = (volume.clamp(0.0, 1.0) * 100.0).round() as u8;
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl LyricsConfig {
    pub fn max_age_secs(&self) -> i64 {
        self.max_age_days.max(0) * 24 * 60 * 60
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Configured token, else the environment.
    pub fn resolved_token(&self) -> Option<String> {
        resolve_token(&self.token, std::env::var(TOKEN_ENV).ok())
    }
}

fn resolve_token(configured: &str, env: Option<String>) -> Option<String> {
    let configured = configured.trim();
    if !configured.is_empty() {
        return Some(configured.to_string());
    }
    env.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn write_private(path: &Path, raw: &str) -> anyhow::Result<()> {
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    write_private(&path, &raw)
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "musicstream", "musicstream")
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = project_dirs().context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Reads the config, writing defaults on first run.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
        let cfg = defaults::defaults();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        write_private(&path, &raw)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.service.base_url, defaults::SERVICE_URL);
        assert_eq!(cfg.audio.resolver, ResolverKind::Service);

        let again = load(Some(&path)).unwrap();
        assert_eq!(again.lyrics.max_age_days, 7);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[audio]\nresolver = \"ytdlp\"\n\n[lyrics]\nbackend = \"lrclib\"\n",
        )
        .unwrap();

        let cfg = load(Some(&path)).unwrap();
        assert_eq!(cfg.audio.resolver, ResolverKind::Ytdlp);
        assert_eq!(cfg.audio.stream_cache_secs, 3600);
        assert_eq!(cfg.lyrics.backend, LyricsBackendKind::Lrclib);
        assert!(cfg.lyrics.cache);
        assert_eq!(cfg.ui.compact_width, 60);
    }

    #[test]
    fn save_round_trips_volume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = defaults::defaults();
        cfg.set_volume(0.35);
        save(&cfg, Some(&path)).unwrap();

        let back = load(Some(&path)).unwrap();
        assert_eq!(back.player.volume, 35);
        assert!((back.initial_volume() - 0.35).abs() < 1e-9);
    }

    #[test]
    fn bad_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[player\nvolume = ").unwrap();
        let err = load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn token_prefers_config_then_env() {
        assert_eq!(resolve_token(" hf_cfg ", Some("hf_env".into())).as_deref(), Some("hf_cfg"));
        assert_eq!(resolve_token("", Some("hf_env".into())).as_deref(), Some("hf_env"));
        assert_eq!(resolve_token("", Some("  ".into())), None);
        assert_eq!(resolve_token("", None), None);
    }

    #[test]
    fn volume_percent_is_clamped() {
        let mut cfg = defaults::defaults();
        cfg.player.volume = 250;
        assert_eq!(cfg.initial_volume(), 1.0);
        cfg.set_volume(-1.0);
        assert_eq!(cfg.player.volume, 0);
    }
}
