mod app;
mod config;
mod inference;
mod input;
mod lyrics;
mod playback;
mod player;
mod queue;
mod recommend;
mod service;
mod storage;
mod tui;

use anyhow::Context;
use app::services::Services;
use clap::{Parser, Subcommand};
use lyrics::LyricsSource;
use service::models::Track;
use service::resolve::AudioResolver;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "musicstream", version, about = "Music discovery and playback in the terminal")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Search tracks and print to stdout (headless).
    Search {
        query: String,
        /// Dump the raw service response instead.
        #[arg(long)]
        json: bool,
    },
    /// Print the playable audio URL for a track id.
    Resolve { id: String },
    /// Fetch lyrics for a song title.
    Lyrics {
        title: String,
        /// Track id used as the cache key.
        #[arg(long)]
        id: Option<String>,
    },
    /// Ask the mood assistant for suggestions.
    Mood { message: String },

    /// Local cache maintenance.
    Cache {
        #[command(subcommand)]
        cmd: CacheCommand,
    },

    /// Audio output device management (mpv).
    Audio {
        #[command(subcommand)]
        cmd: AudioCommand,
    },

    /// Cookies for the yt-dlp resolver.
    Auth {
        #[command(subcommand)]
        method: AuthCommand,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Drop lyrics past their max age and expired stream URLs.
    Prune,
    /// Remove everything.
    Clear,
}

#[derive(Debug, Subcommand)]
enum AudioCommand {
    /// List mpv audio devices.
    List,
    /// Set mpv audio device (name as shown in list).
    Set { device: String },
    /// Clear mpv audio device override.
    Clear,
}

#[derive(Debug, Subcommand)]
enum AuthCommand {
    /// Use yt-dlp `--cookies-from-browser`.
    Browser {
        /// Browser name: chrome, firefox, brave, etc.
        browser: String,
    },
    /// Use a Netscape cookies file on disk.
    File { path: PathBuf },
    /// Clear auth settings.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let cfg_path = match cli.config.clone() {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };

    let command = cli.command.unwrap_or(Command::Tui);
    match &command {
        // Logging to the terminal would tear the TUI.
        Command::Tui => init_tracing(Some(cfg.log_path().as_path()))?,
        _ => init_tracing(None)?,
    }

    match command {
        Command::Tui => {
            let mouse = cfg.input.mouse;
            let mut app = app::App::new(cfg, cfg_path).await?;
            let mut terminal = tui::TerminalGuard::enter(mouse).context("init terminal")?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Search { query, json } => {
            let services = Services::from_config(&cfg)?;
            if json {
                let v = services.service.search_raw(&query).await?;
                println!("{}", serde_json::to_string_pretty(&v)?);
            } else {
                let tracks = services.service.search(&query).await?;
                print_tracks(&tracks);
            }
        }
        Command::Resolve { id } => {
            let services = Services::from_config(&cfg)?;
            let url = services
                .resolver
                .resolve_audio_url(&id)
                .await
                .with_context(|| format!("resolve {id}"))?;
            println!("{url}");
        }
        Command::Lyrics { title, id } => {
            let services = Services::from_config(&cfg)?;
            let track = Track::new(id.unwrap_or_else(|| title.clone()), title);
            println!("{}", services.lyrics.lyrics_for(&track).await);
        }
        Command::Mood { message } => {
            let services = Services::from_config(&cfg)?;
            let reply = services.assistant.reply(&message).await;
            println!("{}", reply.text);
            for (i, s) in reply.suggestions.iter().enumerate() {
                println!("{:02}. {}", i + 1, s.label());
            }
        }
        Command::Cache { cmd } => {
            let services = Services::from_config(&cfg)?;
            match cmd {
                CacheCommand::Prune => {
                    let removed = services.lyrics_cache.prune().await?;
                    println!("Removed {removed} stale cache entries.");
                }
                CacheCommand::Clear => {
                    let db = services.storage.open()?;
                    let (lyrics, streams) = db.counts()?;
                    db.clear()?;
                    println!("Cleared {lyrics} lyrics and {streams} stream URLs.");
                }
            }
        }
        Command::Audio { cmd } => match cmd {
            AudioCommand::List => {
                let out = tokio::process::Command::new("mpv")
                    .args(["--audio-device=help", "--no-video", "--idle=no"])
                    .output()
                    .await
                    .context("run mpv --audio-device=help")?;
                // mpv prints help to stdout.
                print!("{}", String::from_utf8_lossy(&out.stdout));
                eprint!("{}", String::from_utf8_lossy(&out.stderr));
            }
            AudioCommand::Set { device } => {
                let mut cfg = cfg;
                cfg.player.audio_device = Some(device);
                config::save(&cfg, cli.config.as_deref()).context("save config")?;
                println!("Updated audio device in config.");
            }
            AudioCommand::Clear => {
                let mut cfg = cfg;
                cfg.player.audio_device = None;
                config::save(&cfg, cli.config.as_deref()).context("save config")?;
                println!("Cleared audio device override.");
            }
        },
        Command::Auth { method } => {
            let mut cfg = cfg;
            match method {
                AuthCommand::Browser { browser } => {
                    cfg.audio.cookies_from_browser = Some(browser);
                    cfg.audio.cookies = None;
                }
                AuthCommand::File { path } => {
                    cfg.audio.cookies = Some(path);
                    cfg.audio.cookies_from_browser = None;
                }
                AuthCommand::Clear => {
                    cfg.audio.cookies = None;
                    cfg.audio.cookies_from_browser = None;
                }
            }
            config::save(&cfg, cli.config.as_deref()).context("save config")?;
            println!("Updated config auth settings.");
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`. With a path, logs go to that file.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create dir {}", parent.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn print_tracks(tracks: &[Track]) {
    for (i, t) in tracks.iter().enumerate() {
        let duration = t
            .duration_secs
            .map(|d| format!("  [{}:{:02}]", d / 60, d % 60))
            .unwrap_or_default();
        println!("{:02}. {}{}  (id={})", i + 1, t.display_line(), duration, t.id);
    }
}
