use crate::service::models::Track;

/// Where the coordinator is in the life of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing selected yet.
    #[default]
    Empty,
    /// Waiting for the audio URL of the current track.
    Loading,
    /// Audio attached to the transport; playing or paused per `is_playing`.
    Ready,
    /// Selected, but its audio could not be resolved or opened.
    Unplayable,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Empty => "Idle",
            Phase::Loading => "Loading",
            Phase::Ready => "Ready",
            Phase::Unplayable => "Unplayable",
        }
    }
}

/// Coordinator-owned playback state. Surfaces read it, never write it.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub current: Option<Track>,
    pub phase: Phase,
    /// Intent; the transport converges to it.
    pub is_playing: bool,
    /// Seconds.
    pub position: f64,
    /// Seconds; `0.0` until the transport reports it.
    pub duration: f64,
    /// `0.0..=1.0`; `0.0` means muted.
    pub volume: f64,
    pub lyrics: String,
    pub lyrics_loading: bool,
}

impl PlaybackState {
    pub fn new(volume: f64) -> Self {
        Self {
            current: None,
            phase: Phase::Empty,
            is_playing: false,
            position: 0.0,
            duration: 0.0,
            volume: clamp_volume(volume),
            lyrics: String::new(),
            lyrics_loading: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }

    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

pub(crate) fn clamp_volume(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Seek target within `[0, duration]`.
pub(crate) fn clamp_seek(t: f64, duration: f64) -> f64 {
    let upper = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    if t.is_nan() { 0.0 } else { t.clamp(0.0, upper) }
}

/// Transport-reported position; only bounded above once duration is known.
pub(crate) fn clamp_reported(t: f64, duration: f64) -> f64 {
    if !t.is_finite() || t < 0.0 {
        0.0
    } else if duration > 0.0 {
        t.min(duration)
    } else {
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_bounds() {
        assert_eq!(clamp_seek(500.0, 200.0), 200.0);
        assert_eq!(clamp_seek(-3.0, 200.0), 0.0);
        assert_eq!(clamp_seek(f64::NAN, 200.0), 0.0);
        assert_eq!(clamp_seek(10.0, 0.0), 0.0);
        assert_eq!(clamp_seek(10.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn volume_bounds() {
        assert_eq!(clamp_volume(1.5), 1.0);
        assert_eq!(clamp_volume(-0.1), 0.0);
        assert_eq!(clamp_volume(f64::NAN), 0.0);
        assert_eq!(PlaybackState::new(7.0).volume, 1.0);
    }

    #[test]
    fn progress_needs_duration() {
        let mut s = PlaybackState::default();
        s.position = 30.0;
        assert_eq!(s.progress(), 0.0);
        s.duration = 120.0;
        assert_eq!(s.progress(), 0.25);
        assert_eq!(clamp_reported(150.0, 120.0), 120.0);
        assert_eq!(clamp_reported(150.0, 0.0), 150.0);
    }
}
