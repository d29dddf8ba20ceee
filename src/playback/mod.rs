//! The playback coordinator: current track, play/pause intent, position,
//! volume, and the queue, kept consistent against an unreliable transport
//! and two asynchronous lookups (audio URL and lyrics).
//!
//! All mutation happens on the caller's task. `select_track` spawns the two
//! lookups and returns; their results come back as [`PlaybackEvent`]s that
//! the owner feeds into [`Coordinator::handle_event`]. Each lookup carries
//! the selection token it was started under, and a result whose token is no
//! longer current is dropped. Transport events are matched the same way
//! against the [`MediaId`] returned by the last load.

pub mod state;

use crate::lyrics::LyricsSource;
use crate::player::{MediaId, Transport, TransportEvent};
use crate::queue::Queue;
use crate::service::models::Track;
use crate::service::resolve::{AudioResolver, ResolveError};
use state::{clamp_reported, clamp_seek, clamp_volume};
use std::sync::Arc;
use tokio::sync::mpsc;

pub use state::{Phase, PlaybackState};

#[derive(Debug)]
pub enum PlaybackEvent {
    AudioResolved {
        token: u64,
        result: Result<String, ResolveError>,
    },
    LyricsFetched {
        token: u64,
        lyrics: String,
    },
    Transport {
        media: MediaId,
        event: TransportEvent,
    },
}

pub struct Coordinator {
    state: PlaybackState,
    queue: Queue,
    selection: u64,
    /// What the transport has loaded for the current selection.
    media: Option<MediaId>,
    transport: Arc<dyn Transport>,
    resolver: Arc<dyn AudioResolver>,
    lyrics: Arc<dyn LyricsSource>,
    events: mpsc::Sender<PlaybackEvent>,
}

impl Coordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        resolver: Arc<dyn AudioResolver>,
        lyrics: Arc<dyn LyricsSource>,
        events: mpsc::Sender<PlaybackEvent>,
        volume: f64,
    ) -> Self {
        Self {
            state: PlaybackState::new(volume),
            queue: Queue::new(),
            selection: 0,
            media: None,
            transport,
            resolver,
            lyrics,
            events,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn enqueue(&mut self, track: Track) {
        tracing::debug!(track_id = %track.id, "enqueue");
        self.queue.enqueue(track);
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Make `track` current and start resolving its audio and lyrics.
    /// Returns immediately; `is_playing` is left as it was.
    pub fn select_track(&mut self, track: Track) {
        self.selection += 1;
        let token = self.selection;
        tracing::info!(track_id = %track.id, title = %track.title, token, "select track");

        self.state.position = 0.0;
        self.state.duration = 0.0;
        self.state.lyrics.clear();
        self.state.lyrics_loading = true;
        self.state.phase = Phase::Loading;
        self.state.current = Some(track.clone());
        self.media = None;

        let resolver = Arc::clone(&self.resolver);
        let tx = self.events.clone();
        let track_id = track.id.clone();
        tokio::spawn(async move {
            let result = resolver.resolve_audio_url(&track_id).await;
            let _ = tx.send(PlaybackEvent::AudioResolved { token, result }).await;
        });

        let lyrics = Arc::clone(&self.lyrics);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let text = lyrics.lyrics_for(&track).await;
            let _ = tx
                .send(PlaybackEvent::LyricsFetched {
                    token,
                    lyrics: text,
                })
                .await;
        });
    }

    /// Select and play.
    pub async fn play_track(&mut self, track: Track) {
        self.select_track(track);
        self.set_playing(true).await;
    }

    /// Update the play intent. Play waits until the audio is attached; pause
    /// is sent right away in every phase, since the transport may still be
    /// playing the previous track. After a resolution failure, play is
    /// refused.
    pub async fn set_playing(&mut self, playing: bool) {
        if playing && self.state.phase == Phase::Unplayable {
            tracing::debug!("play ignored: current track is unplayable");
            return;
        }
        self.state.is_playing = playing;
        self.apply_intent().await;
    }

    pub async fn toggle_playing(&mut self) {
        self.set_playing(!self.state.is_playing).await;
    }

    pub async fn seek(&mut self, seconds: f64) {
        let target = clamp_seek(seconds, self.state.duration);
        self.state.position = target;
        if self.state.phase == Phase::Ready
            && let Err(e) = self.transport.seek(target).await
        {
            tracing::warn!("transport seek failed: {e:#}");
        }
    }

    pub async fn seek_relative(&mut self, delta: f64) {
        self.seek(self.state.position + delta).await;
    }

    pub async fn set_volume(&mut self, volume: f64) {
        self.state.volume = clamp_volume(volume);
        if let Err(e) = self.transport.set_volume(self.state.volume).await {
            tracing::warn!("transport volume failed: {e:#}");
        }
    }

    /// Muted -> full volume, anything else -> muted. Unmuting always restores
    /// `1.0`, not the previous level.
    pub async fn toggle_mute(&mut self) {
        let next = if self.state.volume > 0.0 { 0.0 } else { 1.0 };
        self.set_volume(next).await;
    }

    /// Natural end of the current track.
    pub async fn advance_on_end(&mut self) {
        match self.queue.dequeue_head() {
            Some(next) => {
                self.select_track(next);
                self.state.is_playing = true;
            }
            None => {
                tracing::info!("queue exhausted");
                self.state.is_playing = false;
                self.state.position = self.state.duration;
                self.apply_intent().await;
            }
        }
    }

    /// User skip. With an empty queue the current track stays and play is
    /// requested.
    pub async fn skip_next(&mut self) {
        match self.queue.dequeue_head() {
            Some(next) => {
                self.select_track(next);
                self.state.is_playing = true;
            }
            None => self.set_playing(true).await,
        }
    }

    pub async fn handle_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::AudioResolved { token, result } => {
                if token != self.selection {
                    tracing::debug!(token, current = self.selection, "dropping stale audio url");
                    return;
                }
                self.attach(result).await;
            }
            PlaybackEvent::LyricsFetched { token, lyrics } => {
                if token != self.selection {
                    tracing::debug!(token, current = self.selection, "dropping stale lyrics");
                    return;
                }
                self.state.lyrics = lyrics;
                self.state.lyrics_loading = false;
            }
            PlaybackEvent::Transport { media, event } => self.on_transport(media, event).await,
        }
    }

    async fn attach(&mut self, result: Result<String, ResolveError>) {
        let url = match result {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(track_id = ?self.current_id(), "audio resolution failed: {e}");
                self.mark_unplayable().await;
                return;
            }
        };

        if let Err(e) = self.transport.set_volume(self.state.volume).await {
            tracing::warn!("transport volume failed: {e:#}");
        }
        match self.transport.load(&url).await {
            Ok(media) => self.media = Some(media),
            Err(e) => {
                tracing::warn!(track_id = ?self.current_id(), "transport load failed: {e:#}");
                self.mark_unplayable().await;
                return;
            }
        }

        self.state.phase = Phase::Ready;
        self.sync_transport().await;
    }

    async fn on_transport(&mut self, media: MediaId, event: TransportEvent) {
        // Anything before attach, or tagged with replaced media, is stale.
        if self.state.phase != Phase::Ready || self.media != Some(media) {
            tracing::trace!(?event, media, phase = ?self.state.phase, "ignoring transport event");
            return;
        }
        match event {
            TransportEvent::Position { seconds } => {
                self.state.position = clamp_reported(seconds, self.state.duration);
            }
            TransportEvent::Duration { seconds } => {
                self.state.duration = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
                self.state.position = clamp_reported(self.state.position, self.state.duration);
            }
            TransportEvent::Ended => self.advance_on_end().await,
            TransportEvent::Error(msg) => {
                // Pause only; no auto-advance on runtime errors.
                tracing::warn!(track_id = ?self.current_id(), "transport error: {msg}");
                self.state.is_playing = false;
                self.sync_transport().await;
            }
        }
    }

    /// The previous track may still be audible; silence it.
    async fn mark_unplayable(&mut self) {
        self.state.phase = Phase::Unplayable;
        self.state.is_playing = false;
        self.media = None;
        self.sync_transport().await;
    }

    async fn apply_intent(&self) {
        if self.state.phase == Phase::Ready || !self.state.is_playing {
            self.sync_transport().await;
        }
    }

    async fn sync_transport(&self) {
        let res = if self.state.is_playing {
            self.transport.play().await
        } else {
            self.transport.pause().await
        };
        if let Err(e) = res {
            tracing::warn!(playing = self.state.is_playing, "transport command failed: {e:#}");
        }
    }

    fn current_id(&self) -> Option<&str> {
        self.state.current.as_ref().map(|t| t.id.as_str())
    }
}
