//! mpv process control over JSON IPC
//!
//! Playback goes through a spawned mpv in idle mode: commands are
//! written as JSON lines to its socket, and observed properties come
//! back on the same stream as events.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Context;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::net::UnixStream;
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, mpsc};

use crate::app::events::{Event, PlayerEvent};

const BASE_ARGS: &[&str] = &[
    "--no-video",
    "--idle=yes",
    "--input-terminal=no",
    // Silence the terminal; errors come back over IPC instead.
    "--really-quiet",
];

/// Properties whose changes drive playback state and lyric sync.
/// Observe ids are their position here plus one.
const OBSERVED: &[&str] = &["time-pos", "duration", "pause", "eof-reached"];

/// Handle to a spawned mpv process driven over its JSON IPC socket
#[derive(Debug)]
pub struct MpvHandle {
    child: Child,
    socket: PathBuf,
    writer: Mutex<WriteHalf<UnixStream>>,
    next_request: AtomicU64,
}

impl MpvHandle {
    pub async fn spawn(
        tx: mpsc::Sender<Event>,
        audio_device: Option<&str>,
        log_file: Option<&Path>,
    ) -> anyhow::Result<Self> {
        // Pid-suffixed so two instances do not fight over one socket.
        let socket =
            std::env::temp_dir().join(format!("refrain-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket);

        let mut cmd = Command::new("mpv");
        cmd.args(BASE_ARGS)
            .arg(format!("--input-ipc-server={}", socket.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dev) = audio_device {
            cmd.arg(format!("--audio-device={dev}"));
        }
        if let Some(p) = log_file {
            cmd.arg(format!("--log-file={}", p.display()));
        }
        let child = cmd.spawn().context("spawn mpv")?;

        // mpv creates the socket shortly after starting.
        let stream = connect_with_retry(&socket).await?;
        let (reader, writer) = tokio::io::split(stream);
        tokio::spawn(pump_events(reader, tx));

        let this = Self {
            child,
            socket,
            writer: Mutex::new(writer),
            next_request: AtomicU64::new(1),
        };

        // Load failures surface as warn-level log messages.
        this.send(json!({"command": ["request_log_messages", "warn"]}))
            .await?;
        for (i, prop) in OBSERVED.iter().enumerate() {
            this.send(json!({"command": ["observe_property", i + 1, prop]}))
                .await?;
        }

        Ok(this)
    }

    pub async fn load_url(&self, url: &str) -> anyhow::Result<()> {
        self.send(json!({"command": ["loadfile", url, "replace"]}))
            .await
    }

    pub async fn toggle_pause(&self) -> anyhow::Result<()> {
        self.send(json!({"command": ["cycle", "pause"]})).await
    }

    pub async fn set_paused(&self, paused: bool) -> anyhow::Result<()> {
        self.send(json!({"command": ["set_property", "pause", paused]}))
            .await
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        self.send(json!({"command": ["stop"]})).await
    }

    pub async fn seek_relative(&self, seconds: f64) -> anyhow::Result<()> {
        self.send(json!({"command": ["seek", seconds, "relative"]}))
            .await
    }

    pub async fn seek_absolute(&self, seconds: f64) -> anyhow::Result<()> {
        self.send(json!({"command": ["seek", seconds, "absolute"]}))
            .await
    }

    pub async fn set_volume(&self, percent: u8) -> anyhow::Result<()> {
        self.send(json!({"command": ["set_property", "volume", percent]}))
            .await
    }

    /// Write one command line, tagged so errors come back attributable.
    async fn send(&self, mut v: Value) -> anyhow::Result<()> {
        if let Value::Object(o) = &mut v {
            let id = self.next_request.fetch_add(1, Ordering::Relaxed);
            o.insert("request_id".into(), Value::from(id));
        }
        let mut line = serde_json::to_vec(&v).context("encode mpv command")?;
        line.push(b'\n');

        let mut w = self.writer.lock().await;
        w.write_all(&line).await.context("write mpv ipc")?;
        w.flush().await.context("flush mpv ipc")?;
        Ok(())
    }
}

impl Drop for MpvHandle {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket);
    }
}

async fn connect_with_retry(path: &Path) -> anyhow::Result<UnixStream> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        match UnixStream::connect(path).await {
            Ok(s) => return Ok(s),
            Err(e) if tokio::time::Instant::now() > deadline => {
                return Err(e).with_context(|| format!("connect to mpv ipc {}", path.display()));
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(50)).await,
        }
    }
}

/// Forward mpv's IPC stream into app events until the socket closes.
async fn pump_events(reader: ReadHalf<UnixStream>, tx: mpsc::Sender<Event>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<Value>(&line) else {
            continue;
        };
        if let Some(err) = reply_error(&v) {
            let _ = tx.send(Event::Player(PlayerEvent::Error(err))).await;
        }
        if let Some(pe) = decode_event(&v) {
            let _ = tx.send(Event::Player(pe)).await;
        }
    }
}

/// A command reply whose error field is anything but "success".
fn reply_error(v: &Value) -> Option<String> {
    v.get("request_id")?;
    let err = v.get("error")?.as_str()?;
    (err != "success").then(|| format!("mpv ipc error: {err}"))
}

fn decode_event(v: &Value) -> Option<PlayerEvent> {
    match v.get("event")?.as_str()? {
        "property-change" => decode_property(v),
        "end-file" => {
            // A failed stream load arrives as end-file with reason=error.
            if v.get("reason").and_then(Value::as_str) == Some("error") {
                let err = v.get("error").and_then(Value::as_str).unwrap_or("unknown");
                Some(PlayerEvent::Error(format!("mpv end-file error: {err}")))
            } else {
                Some(PlayerEvent::Ended)
            }
        }
        "log-message" => {
            let level = v.get("level")?.as_str()?;
            let text = v.get("text")?.as_str()?.trim();
            if matches!(level, "warn" | "error") && !text.is_empty() {
                Some(PlayerEvent::Error(format!("mpv {level}: {text}")))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn decode_property(v: &Value) -> Option<PlayerEvent> {
    let data = v.get("data");
    match v.get("name")?.as_str()? {
        "time-pos" => Some(PlayerEvent::Position {
            seconds: data?.as_f64().unwrap_or(0.0),
        }),
        "duration" => Some(PlayerEvent::Duration {
            seconds: data?.as_f64().unwrap_or(0.0),
        }),
        "pause" => Some(match data?.as_bool() {
            Some(true) => PlayerEvent::Paused,
            _ => PlayerEvent::Started,
        }),
        "eof-reached" => (data?.as_bool() == Some(true)).then_some(PlayerEvent::Ended),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_property_changes() {
        let v = json!({"event":"property-change","name":"time-pos","data":12.5});
        assert_eq!(decode_event(&v), Some(PlayerEvent::Position { seconds: 12.5 }));

        let v = json!({"event":"property-change","name":"pause","data":true});
        assert_eq!(decode_event(&v), Some(PlayerEvent::Paused));

        let v = json!({"event":"property-change","name":"pause","data":false});
        assert_eq!(decode_event(&v), Some(PlayerEvent::Started));

        let v = json!({"event":"property-change","name":"eof-reached","data":false});
        assert_eq!(decode_event(&v), None);

        let v = json!({"event":"property-change","name":"eof-reached","data":true});
        assert_eq!(decode_event(&v), Some(PlayerEvent::Ended));
    }

    #[test]
    fn test_decode_end_file() {
        let v = json!({"event":"end-file","reason":"eof"});
        assert_eq!(decode_event(&v), Some(PlayerEvent::Ended));

        let v = json!({"event":"end-file","reason":"error","error":"nothing to play"});
        match decode_event(&v) {
            Some(PlayerEvent::Error(msg)) => assert!(msg.contains("nothing to play")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_log_message_levels() {
        let v = json!({"event":"log-message","level":"warn","text":"bad stream\n"});
        match decode_event(&v) {
            Some(PlayerEvent::Error(msg)) => assert_eq!(msg, "mpv warn: bad stream"),
            other => panic!("unexpected event: {other:?}"),
        }

        let v = json!({"event":"log-message","level":"info","text":"starting"});
        assert_eq!(decode_event(&v), None);
    }

    #[test]
    fn test_reply_error_ignores_success() {
        assert_eq!(reply_error(&json!({"request_id":3,"error":"success"})), None);
        assert_eq!(
            reply_error(&json!({"request_id":3,"error":"invalid parameter"})),
            Some("mpv ipc error: invalid parameter".into())
        );
        // Untagged lines are events, not replies.
        assert_eq!(reply_error(&json!({"error":"x"})), None);
    }
}
