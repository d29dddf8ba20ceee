//! Audio transport: the media engine the coordinator commands.
//!
//! The transport is best-effort. It may fail to open a URL, finish
//! asynchronously, or lag behind the play/pause intent; it reports back
//! through [`TransportEvent`]s on the playback channel.

pub mod mpv;

use async_trait::async_trait;

/// Names one `load` on a transport. Events carry the id of the media they
/// were reported for, so late events from replaced media can be told apart.
pub type MediaId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Position { seconds: f64 },
    Duration { seconds: f64 },
    /// Natural end of the loaded media.
    Ended,
    /// Runtime failure of the loaded media (decode, network).
    Error(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Replace whatever is loaded with `url`.
    async fn load(&self, url: &str) -> anyhow::Result<MediaId>;
    async fn play(&self) -> anyhow::Result<()>;
    async fn pause(&self) -> anyhow::Result<()>;
    /// Absolute position in seconds.
    async fn seek(&self, seconds: f64) -> anyhow::Result<()>;
    /// `volume` in `[0, 1]`.
    async fn set_volume(&self, volume: f64) -> anyhow::Result<()>;
}

/// Used when mpv can't be started; accepts every command and plays nothing.
#[derive(Debug, Default)]
pub struct NullTransport;

#[async_trait]
impl Transport for NullTransport {
    async fn load(&self, url: &str) -> anyhow::Result<MediaId> {
        tracing::debug!(url, "null transport: load");
        // Never reports events, so every load can share one id.
        Ok(0)
    }

    async fn play(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn pause(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn seek(&self, _seconds: f64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn set_volume(&self, _volume: f64) -> anyhow::Result<()> {
        Ok(())
    }
}
