//! Builds the collaborators named in the config. Shared by the TUI and the
//! headless commands.

use crate::config::{Config, LyricsBackendKind, ResolverKind};
use crate::inference::InferenceClient;
use crate::lyrics::generate::GeneratedLyrics;
use crate::lyrics::{LrclibClient, LyricsBackend, LyricsCache, LyricsClient};
use crate::recommend::Assistant;
use crate::service::api::ServiceClient;
use crate::service::resolve::{AudioResolver, CachedResolver, YtDlpResolver};
use crate::storage::{Storage, StorageHandle};
use anyhow::Context;
use std::sync::Arc;

pub struct Services {
    pub service: ServiceClient,
    pub storage: StorageHandle,
    pub resolver: Arc<dyn AudioResolver>,
    pub lyrics: Arc<LyricsClient>,
    pub lyrics_cache: LyricsCache,
    pub assistant: Assistant,
}

impl Services {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let storage = StorageHandle::new(cfg.cache_db_path());
        // Creates the file and schema up front so later opens are cheap.
        let _ = Storage::open(storage.path()).context("open cache database")?;

        let service = ServiceClient::new(&cfg.service.base_url, cfg.service.timeout())
            .context("build service client")?;
        tracing::debug!(service = service.base_url(), resolver = ?cfg.audio.resolver, "services configured");
        let inference = inference_client(cfg);

        let resolver = build_resolver(cfg, &service, &storage);
        let lyrics_cache = LyricsCache::new(storage.clone(), cfg.lyrics.max_age_secs());
        let backend = build_lyrics_backend(cfg, &service, inference.as_ref())?;
        let lyrics = Arc::new(LyricsClient::new(
            backend,
            cfg.lyrics.cache.then(|| lyrics_cache.clone()),
        ));

        let assistant = match inference {
            Some(client) => Assistant::with_inference(
                client,
                &cfg.inference.sentiment_model,
                &cfg.inference.generation_model,
            ),
            None => Assistant::offline(),
        };

        Ok(Self {
            service,
            storage,
            resolver,
            lyrics,
            lyrics_cache,
            assistant,
        })
    }
}

fn inference_client(cfg: &Config) -> Option<InferenceClient> {
    let token = cfg.inference.resolved_token()?;
    match InferenceClient::new(&cfg.inference.base_url, &token, cfg.inference.timeout()) {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::warn!("inference disabled: {e}");
            None
        }
    }
}

fn build_resolver(
    cfg: &Config,
    service: &ServiceClient,
    storage: &StorageHandle,
) -> Arc<dyn AudioResolver> {
    let base: Arc<dyn AudioResolver> = match cfg.audio.resolver {
        ResolverKind::Service => Arc::new(service.clone()),
        ResolverKind::Ytdlp => Arc::new(YtDlpResolver {
            cookies: cfg.audio.cookies.clone(),
            cookies_from_browser: cfg.audio.cookies_from_browser.clone(),
        }),
    };
    if cfg.audio.stream_cache_secs > 0 {
        Arc::new(CachedResolver::new(
            base,
            storage.clone(),
            cfg.audio.stream_cache_secs,
        ))
    } else {
        base
    }
}

fn build_lyrics_backend(
    cfg: &Config,
    service: &ServiceClient,
    inference: Option<&InferenceClient>,
) -> anyhow::Result<Arc<dyn LyricsBackend>> {
    Ok(match cfg.lyrics.backend {
        LyricsBackendKind::Service => Arc::new(service.clone()),
        LyricsBackendKind::Lrclib => Arc::new(LrclibClient::new(cfg.service.timeout())?),
        LyricsBackendKind::Generate => match inference {
            Some(client) => Arc::new(GeneratedLyrics::new(
                client.clone(),
                &cfg.inference.lyrics_model,
            )),
            None => {
                tracing::warn!("lyrics generation needs an inference token; using the service");
                Arc::new(service.clone())
            }
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;

    fn cfg_in(dir: &std::path::Path) -> Config {
        let mut cfg = defaults::defaults();
        cfg.paths.data_dir = dir.to_path_buf();
        cfg.inference.token = String::new();
        cfg
    }

    #[test]
    fn builds_offline_stack_and_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = cfg_in(dir.path());
        cfg.lyrics.backend = LyricsBackendKind::Generate;
        cfg.audio.resolver = ResolverKind::Ytdlp;

        let services = Services::from_config(&cfg).unwrap();
        assert!(cfg.cache_db_path().exists());
        assert_eq!(services.service.base_url(), defaults::SERVICE_URL);
        if std::env::var(crate::config::TOKEN_ENV).is_err() {
            assert!(!services.assistant.uses_inference());
        }
    }

    #[test]
    fn configured_token_enables_inference() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = cfg_in(dir.path());
        cfg.inference.token = "hf_test".into();
        let services = Services::from_config(&cfg).unwrap();
        assert!(services.assistant.uses_inference());
    }
}
