use crate::playback::PlaybackEvent;
use crate::player::{MediaId, Transport, TransportEvent};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    process::{Child, Command},
    sync::mpsc,
};

#[derive(Debug)]
pub struct MpvHandle {
    child: Child,
    socket_path: PathBuf,
    writer: tokio::sync::Mutex<tokio::io::WriteHalf<UnixStream>>,
    request_id: AtomicU64,
    /// Playlist entries added so far; mpv numbers them from 1.
    entries: AtomicU64,
}

impl MpvHandle {
    pub async fn spawn(
        event_tx: mpsc::Sender<PlaybackEvent>,
        audio_device: Option<&str>,
        log_file: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let socket_path =
            std::env::temp_dir().join(format!("musicstream-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        let mut cmd = Command::new("mpv");
        cmd.args([
            "--no-video",
            "--idle=yes",
            "--input-terminal=no",
            "--really-quiet",
            // Start paused; the coordinator decides when to play.
            "--pause",
            "--audio-channels=stereo",
        ]);
        if let Some(dev) = audio_device {
            cmd.arg(format!("--audio-device={dev}"));
        }
        if let Some(p) = log_file {
            cmd.arg(format!("--log-file={}", p.display()));
        }
        let child = cmd
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn mpv")?;

        // mpv creates the socket shortly after starting.
        let stream = connect_with_retry(&socket_path).await?;
        let (reader, writer) = tokio::io::split(stream);

        tokio::spawn(read_events_loop(reader, event_tx));

        let this = Self {
            child,
            socket_path,
            writer: tokio::sync::Mutex::new(writer),
            request_id: AtomicU64::new(1),
            entries: AtomicU64::new(0),
        };

        this.command(json!({"command":["observe_property", 1, "time-pos"]}))
            .await?;
        this.command(json!({"command":["observe_property", 2, "duration"]}))
            .await?;

        tracing::info!(socket = %this.socket_path.display(), "mpv ready");
        Ok(this)
    }

    async fn command(&self, mut v: serde_json::Value) -> anyhow::Result<()> {
        // Tag requests so failures come back as replies on the IPC stream.
        if v.get("request_id").is_none() {
            let id = self.request_id.fetch_add(1, Ordering::Relaxed);
            if let serde_json::Value::Object(ref mut o) = v {
                o.insert("request_id".to_string(), serde_json::Value::from(id));
            }
        }
        let mut w = self.writer.lock().await;
        let mut line = serde_json::to_vec(&v).context("encode mpv json")?;
        line.push(b'\n');
        w.write_all(&line).await.context("write mpv ipc")?;
        w.flush().await.context("flush mpv ipc")?;
        Ok(())
    }
}

#[async_trait]
impl Transport for MpvHandle {
    /// Each `loadfile replace` adds one playlist entry, so the entry id mpv
    /// reports in `start-file`/`end-file` is the running count of loads.
    async fn load(&self, url: &str) -> anyhow::Result<MediaId> {
        let entry = self.entries.fetch_add(1, Ordering::SeqCst) + 1;
        self.command(json!({"command":["loadfile", url, "replace"]}))
            .await?;
        Ok(entry)
    }

    async fn play(&self) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "pause", false]}))
            .await
    }

    async fn pause(&self) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "pause", true]}))
            .await
    }

    async fn seek(&self, seconds: f64) -> anyhow::Result<()> {
        self.command(json!({"command":["seek", seconds, "absolute"]}))
            .await
    }

    async fn set_volume(&self, volume: f64) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "volume", volume_to_mpv(volume)]}))
            .await
    }
}

impl Drop for MpvHandle {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// mpv's volume scale is 0-100.
fn volume_to_mpv(volume: f64) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}

async fn connect_with_retry(path: &Path) -> anyhow::Result<UnixStream> {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        match UnixStream::connect(path).await {
            Ok(s) => return Ok(s),
            Err(e) => {
                if tokio::time::Instant::now() > deadline {
                    return Err(e).with_context(|| format!("connect to mpv ipc {}", path.display()));
                }
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
        }
    }
}

async fn read_events_loop(
    reader: tokio::io::ReadHalf<UnixStream>,
    event_tx: mpsc::Sender<PlaybackEvent>,
) {
    let mut lines = BufReader::new(reader).lines();
    // Entry that property changes belong to; 0 until the first file starts.
    let mut playing: MediaId = 0;
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        // Command replies: {"request_id":..., "error":"..."}
        if let (Some(rid), Some(err)) = (v.get("request_id"), v.get("error"))
            && let Some(err_s) = err.as_str()
            && err_s != "success"
        {
            tracing::warn!(request_id = %rid, "mpv ipc error: {err_s}");
        }
        let media = entry_of(&v, playing);
        if v.get("event").and_then(|e| e.as_str()) == Some("start-file") {
            playing = media;
        }
        if let Some(event) = map_mpv_event(&v)
            && event_tx
                .send(PlaybackEvent::Transport { media, event })
                .await
                .is_err()
        {
            break;
        }
    }
    tracing::debug!("mpv event stream closed");
}

/// `start-file` and `end-file` name their playlist entry; property changes
/// belong to whichever entry started last.
fn entry_of(v: &serde_json::Value, playing: MediaId) -> MediaId {
    v.get("playlist_entry_id")
        .and_then(|x| x.as_u64())
        .unwrap_or(playing)
}

fn map_mpv_event(v: &serde_json::Value) -> Option<TransportEvent> {
    match v.get("event")?.as_str()? {
        "property-change" => {
            let seconds = v.get("data")?.as_f64()?;
            match v.get("name")?.as_str()? {
                "time-pos" => Some(TransportEvent::Position { seconds }),
                "duration" => Some(TransportEvent::Duration { seconds }),
                _ => None,
            }
        }
        // "stop"/"redirect"/"quit" come from our own loadfile replace; not an end.
        "end-file" => match v.get("reason").and_then(|x| x.as_str()).unwrap_or("") {
            "eof" => Some(TransportEvent::Ended),
            "error" => {
                let err = v.get("file_error").or_else(|| v.get("error"));
                let err = err.and_then(|x| x.as_str()).unwrap_or("unknown");
                Some(TransportEvent::Error(format!("mpv end-file error: {err}")))
            }
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_property_changes() {
        let v = json!({"event":"property-change","id":1,"name":"time-pos","data":12.5});
        assert_eq!(map_mpv_event(&v), Some(TransportEvent::Position { seconds: 12.5 }));

        let v = json!({"event":"property-change","id":2,"name":"duration","data":180.0});
        assert_eq!(map_mpv_event(&v), Some(TransportEvent::Duration { seconds: 180.0 }));

        // Unloaded file reports null data.
        let v = json!({"event":"property-change","id":1,"name":"time-pos","data":null});
        assert_eq!(map_mpv_event(&v), None);
    }

    #[test]
    fn only_eof_ends_a_track() {
        let eof = json!({"event":"end-file","reason":"eof"});
        assert_eq!(map_mpv_event(&eof), Some(TransportEvent::Ended));

        let replaced = json!({"event":"end-file","reason":"stop"});
        assert_eq!(map_mpv_event(&replaced), None);

        let failed = json!({"event":"end-file","reason":"error","file_error":"loading failed"});
        assert_eq!(
            map_mpv_event(&failed),
            Some(TransportEvent::Error("mpv end-file error: loading failed".into()))
        );
    }

    #[test]
    fn events_are_tagged_with_their_playlist_entry() {
        let started = json!({"event":"start-file","playlist_entry_id":2});
        assert_eq!(entry_of(&started, 1), 2);
        assert_eq!(map_mpv_event(&started), None);

        // A late end of the first entry keeps its own id.
        let old_eof = json!({"event":"end-file","reason":"eof","playlist_entry_id":1});
        assert_eq!(entry_of(&old_eof, 2), 1);

        let pos = json!({"event":"property-change","id":1,"name":"time-pos","data":3.0});
        assert_eq!(entry_of(&pos, 2), 2);
    }

    #[test]
    fn volume_scale() {
        assert_eq!(volume_to_mpv(0.0), 0);
        assert_eq!(volume_to_mpv(0.555), 56);
        assert_eq!(volume_to_mpv(1.0), 100);
        assert_eq!(volume_to_mpv(3.0), 100);
    }
}
